use google_sheets4::hyper::Uri;
use gsheets_core::{GSheetError, Result};
use std::time::Duration;

/// Public endpoint of the Sheets API. Request paths carry the `v4/` prefix.
pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com/";

/// Transport settings for a [`SheetSession`](crate::SheetSession).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Base URL every API path is appended to.
    pub api_base: String,
    /// Deadline applied to calls whose [`CallOptions`](gsheets_core::CallOptions) set none.
    pub default_deadline: Option<Duration>,
    pub user_agent: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            default_deadline: None,
            user_agent: concat!("gsheets/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    #[must_use]
    pub fn with_default_deadline(mut self, deadline: Duration) -> Self {
        self.default_deadline = Some(deadline);
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Check the base URL and normalize it so it always ends in `/`.
    pub(crate) fn base_url(&self) -> Result<String> {
        let uri: Uri = self
            .api_base
            .parse()
            .map_err(|e| GSheetError::ServiceInit(format!("API base '{}': {e}", self.api_base)))?;
        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(GSheetError::ServiceInit(format!(
                "API base '{}' is not an absolute URL",
                self.api_base
            )));
        }

        let mut base = self.api_base.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(base)
    }
}
