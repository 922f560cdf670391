use chrono::{DateTime, Datelike, Utc};
use google_sheets4::oauth2::storage::TokenInfo;
use gsheets_core::{GSheetError, Result};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// An OAuth2 token as stored in the token file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl Token {
    /// Decode a token file.
    ///
    /// # Errors
    ///
    /// Returns `GSheetError::TokenParse` if the bytes are not a token document.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| GSheetError::TokenParse(e.to_string()))
    }

    /// The token in the authenticator's form.
    ///
    /// A missing expiry, or the zero timestamp, means the token never expires.
    pub(crate) fn to_token_info(&self) -> TokenInfo {
        let expires_at = self
            .expiry
            .filter(|expiry| expiry.year() > 1)
            .and_then(|expiry| OffsetDateTime::from_unix_timestamp(expiry.timestamp()).ok());

        TokenInfo {
            access_token: Some(self.access_token.clone()),
            refresh_token: self.refresh_token.clone(),
            expires_at,
            id_token: None,
        }
    }

    /// Back from the authenticator's form, for writing to the token file.
    pub(crate) fn from_token_info(info: &TokenInfo) -> Result<Self> {
        let access_token = info.access_token.clone().ok_or_else(|| {
            GSheetError::AuthExchange("token endpoint issued no access token".to_string())
        })?;

        Ok(Self {
            access_token,
            token_type: "Bearer".to_string(),
            refresh_token: info.refresh_token.clone(),
            expiry: info
                .expires_at
                .and_then(|at| DateTime::from_timestamp(at.unix_timestamp(), at.nanosecond())),
        })
    }
}
