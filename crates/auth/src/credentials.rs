use google_sheets4::hyper::Uri;
use google_sheets4::oauth2::{self, ApplicationSecret};
use gsheets_core::{GSheetError, Result};

/// Read/write access to spreadsheets and their properties.
pub const SCOPE_SPREADSHEETS: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Read-only access to spreadsheets and their properties.
pub const SCOPE_SPREADSHEETS_READONLY: &str =
    "https://www.googleapis.com/auth/spreadsheets.readonly";

/// OAuth2 client configuration for one scope.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    secret: ApplicationSecret,
    scope: &'static str,
}

impl OAuthConfig {
    /// Parse client-secret JSON (an "installed" or "web" client) and scope it
    /// to read-only or read/write spreadsheet access.
    ///
    /// # Errors
    ///
    /// Returns `GSheetError::ConfigParse` if the bytes are not a client-secret
    /// document or either endpoint is not an absolute URL.
    pub fn from_json(bytes: &[u8], read_only: bool) -> Result<Self> {
        let secret = oauth2::parse_application_secret(bytes)
            .map_err(|e| GSheetError::ConfigParse(e.to_string()))?;

        if secret.client_id.is_empty() {
            return Err(GSheetError::ConfigParse("missing client_id".to_string()));
        }
        check_endpoint("auth_uri", &secret.auth_uri)?;
        check_endpoint("token_uri", &secret.token_uri)?;

        Ok(Self {
            secret,
            scope: if read_only {
                SCOPE_SPREADSHEETS_READONLY
            } else {
                SCOPE_SPREADSHEETS
            },
        })
    }

    pub fn secret(&self) -> &ApplicationSecret {
        &self.secret
    }

    pub fn scope(&self) -> &'static str {
        self.scope
    }

    /// First redirect URI listed for the client, used when the code is pasted.
    pub fn redirect_uri(&self) -> Option<&str> {
        self.secret.redirect_uris.first().map(String::as_str)
    }

    /// Whether this configuration only grants read access.
    pub fn is_read_only(&self) -> bool {
        self.scope == SCOPE_SPREADSHEETS_READONLY
    }
}

fn check_endpoint(field: &str, value: &str) -> Result<()> {
    let uri: Uri = value
        .parse()
        .map_err(|e| GSheetError::ConfigParse(format!("{field} '{value}': {e}")))?;
    if uri.scheme().is_none() || uri.authority().is_none() {
        return Err(GSheetError::ConfigParse(format!(
            "{field} '{value}': not an absolute URL"
        )));
    }
    Ok(())
}
