use crate::config::SessionConfig;
use google_sheets4::hyper::{self, Body, Response};
use google_sheets4::Sheets;
use gsheets_auth::{https_client, session_authenticator, Connector, OAuthConfig, Token};
use gsheets_core::{GSheetError, Result};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;

/// Authenticated handle to the Sheets hub.
pub(crate) struct SheetsService {
    hub: Sheets<Connector>,
    scope: &'static str,
    default_deadline: Option<Duration>,
}

impl SheetsService {
    pub(crate) async fn new(
        oauth: &OAuthConfig,
        token: &Token,
        config: &SessionConfig,
    ) -> Result<Self> {
        let base = config.base_url()?;
        let client = https_client();
        let auth = session_authenticator(oauth, token, client.clone()).await?;

        let mut hub = Sheets::new(client, auth);
        hub.base_url(base);
        hub.user_agent(config.user_agent.clone());

        Ok(Self {
            hub,
            scope: oauth.scope(),
            default_deadline: config.default_deadline,
        })
    }

    pub(crate) fn hub(&self) -> &Sheets<Connector> {
        &self.hub
    }

    /// The one scope every call is made with.
    pub(crate) fn scope(&self) -> &'static str {
        self.scope
    }

    pub(crate) fn default_deadline(&self) -> Option<Duration> {
        self.default_deadline
    }

    /// Await a call builder's `doit()`, keeping the decoded body.
    pub(crate) async fn execute<T, F>(
        &self,
        operation: &'static str,
        target: &str,
        call: F,
    ) -> Result<T>
    where
        F: Future<Output = google_sheets4::Result<(Response<Body>, T)>>,
    {
        tracing::debug!("{operation} {target}");
        match call.await {
            Ok((_, body)) => Ok(body),
            Err(e) => Err(remote_error(operation, target, e).await),
        }
    }
}

async fn remote_error(
    operation: &'static str,
    target: &str,
    err: google_sheets4::Error,
) -> GSheetError {
    match err {
        google_sheets4::Error::BadRequest(body) => {
            let (status, message) = envelope_message(&body);
            GSheetError::remote(operation, target, status, message)
        }
        google_sheets4::Error::Failure(response) => {
            let status = response.status();
            let reason = status.canonical_reason().unwrap_or("Unknown");
            let body = match hyper::body::to_bytes(response.into_body()).await {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    tracing::debug!("Cannot read {operation} error body: {e}");
                    None
                }
            };
            let message = failure_message(reason, body.as_deref());
            GSheetError::remote(operation, target, Some(status.as_u16()), message)
        }
        google_sheets4::Error::MissingToken(e) => {
            GSheetError::remote("token.refresh", target, None, e.to_string())
        }
        other => GSheetError::remote(operation, target, None, other.to_string()),
    }
}

/// Status and message of a Google error envelope,
/// `{"error": {"code": 404, "message": "...", "status": "NOT_FOUND"}}`.
fn envelope_message(body: &Value) -> (Option<u16>, String) {
    let error = &body["error"];
    let status = error["code"].as_u64().and_then(|code| u16::try_from(code).ok());
    let message = [&error["message"], &error["status"]]
        .into_iter()
        .filter_map(Value::as_str)
        .find(|text| !text.is_empty())
        .map_or_else(|| body.to_string(), str::to_string);
    (status, message)
}

/// Message for a non-JSON error response. `body` is `None` when it could not
/// be read; an unreadable or empty body falls back to the status reason.
fn failure_message(reason: &str, body: Option<&[u8]>) -> String {
    match body {
        Some(bytes) if !bytes.is_empty() => String::from_utf8_lossy(bytes).into_owned(),
        _ => reason.to_string(),
    }
}
