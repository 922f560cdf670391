use async_trait::async_trait;
use google_sheets4::oauth2::storage::{TokenInfo, TokenStorage};
use std::sync::{Arc, Mutex, PoisonError};

/// Token cache shared between an authenticator and its owner.
///
/// Holds a single token regardless of the scopes asked for; a session only
/// ever requests one scope. Nothing is written to disk.
#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryTokenStorage {
    token: Arc<Mutex<Option<TokenInfo>>>,
}

impl MemoryTokenStorage {
    pub(crate) fn seeded(token: TokenInfo) -> Self {
        Self {
            token: Arc::new(Mutex::new(Some(token))),
        }
    }

    pub(crate) fn current(&self) -> Option<TokenInfo> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl TokenStorage for MemoryTokenStorage {
    async fn set(&self, _scopes: &[&str], token: TokenInfo) -> anyhow::Result<()> {
        tracing::debug!("Caching token issued by the token endpoint");
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token);
        Ok(())
    }

    async fn get(&self, _scopes: &[&str]) -> Option<TokenInfo> {
        self.current()
    }
}
