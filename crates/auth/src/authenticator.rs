use crate::client::{HttpClient, SessionAuthenticator};
use crate::credentials::OAuthConfig;
use crate::storage::MemoryTokenStorage;
use crate::token::Token;
use google_sheets4::oauth2::authenticator_delegate::InstalledFlowDelegate;
use google_sheets4::oauth2::{InstalledFlowAuthenticator, InstalledFlowReturnMethod};
use gsheets_core::{GSheetError, Result};
use std::future::Future;
use std::pin::Pin;

/// Build the authenticator a session hands to the Sheets hub.
///
/// It serves `token`, refreshes it through the token endpoint shortly before
/// it expires and keeps the refreshed token in memory only. It never starts
/// an interactive flow: a token that cannot be refreshed is an error.
///
/// # Errors
///
/// Returns `GSheetError::ServiceInit` if the authenticator cannot be built.
pub async fn session_authenticator(
    config: &OAuthConfig,
    token: &Token,
    client: HttpClient,
) -> Result<SessionAuthenticator> {
    let storage = MemoryTokenStorage::seeded(token.to_token_info());

    InstalledFlowAuthenticator::with_client(
        config.secret().clone(),
        InstalledFlowReturnMethod::Interactive,
        client,
    )
    .with_storage(Box::new(storage))
    .flow_delegate(Box::new(NoPrompt))
    .build()
    .await
    .map_err(|e| GSheetError::ServiceInit(e.to_string()))
}

/// Current access token for `scope`, refreshed first when it is stale.
///
/// # Errors
///
/// Returns `GSheetError::RemoteCall` for `token.refresh` if the token cannot
/// be refreshed.
pub async fn access_token(auth: &SessionAuthenticator, scope: &str) -> Result<String> {
    let token = auth
        .token(&[scope])
        .await
        .map_err(|e| GSheetError::remote("token.refresh", "oauth2", None, e.to_string()))?;
    token
        .token()
        .map(str::to_string)
        .ok_or_else(|| {
            GSheetError::remote("token.refresh", "oauth2", None, "no access token issued")
        })
}

/// Refuses every interactive prompt.
struct NoPrompt;

impl InstalledFlowDelegate for NoPrompt {
    fn present_user_url<'a>(
        &'a self,
        _url: &'a str,
        _need_code: bool,
    ) -> Pin<Box<dyn Future<Output = std::result::Result<String, String>> + Send + 'a>> {
        Box::pin(async {
            Err("stored token is missing or cannot be refreshed; acquire a new token".to_string())
        })
    }
}
