//! Interactive token acquisition for command-line tools.

use crate::client::https_client;
use crate::credentials::OAuthConfig;
use crate::storage::MemoryTokenStorage;
use crate::store;
use crate::token::Token;
use google_sheets4::oauth2::authenticator_delegate::InstalledFlowDelegate;
use google_sheets4::oauth2::{InstalledFlowAuthenticator, InstalledFlowReturnMethod};
use gsheets_core::{CallOptions, GSheetError, Result};
use std::future::Future;
use std::io::{BufRead, Write};
use std::path::Path;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Where the authorization code comes from.
pub enum CodeSource {
    /// One line typed (or pasted) by the operator.
    Console(Box<dyn BufRead + Send>),
    /// The browser redirect, received by a local HTTP server on this port.
    /// Port 0 picks a free one.
    Loopback(u16),
}

impl CodeSource {
    /// Read the code from standard input.
    pub fn stdin() -> Self {
        Self::Console(Box::new(std::io::BufReader::new(std::io::stdin())))
    }

    /// Wait for the browser redirect on `127.0.0.1:port`.
    pub fn loopback(port: u16) -> Self {
        Self::Loopback(port)
    }
}

/// Run the authorization-code flow once and persist the resulting token.
///
/// Prints the authorization URL to `out`, waits for the code from `source`,
/// exchanges it, writes the token to `token_path` (create or truncate) and
/// returns the bytes read back from that file. Waiting for the code and the
/// exchange both run under `opts`.
///
/// # Errors
///
/// - `GSheetError::ConfigParse` if `credentials` are malformed
/// - `GSheetError::AuthExchange` if no code is received or the exchange fails
/// - `GSheetError::Deadline` / `GSheetError::Cancelled` if `opts` cut it short
/// - `GSheetError::TokenWrite` if the token file cannot be written
pub async fn acquire_token<P, W>(
    credentials: &[u8],
    token_path: P,
    read_only: bool,
    source: CodeSource,
    out: W,
    opts: &CallOptions,
) -> Result<Vec<u8>>
where
    P: AsRef<Path>,
    W: Write + Send + 'static,
{
    let config = OAuthConfig::from_json(credentials, read_only)?;
    let out: SharedWriter = Arc::new(Mutex::new(Box::new(out)));

    let (method, delegate) = match source {
        CodeSource::Console(reader) => (
            InstalledFlowReturnMethod::Interactive,
            PromptDelegate {
                out: Arc::clone(&out),
                input: Mutex::new(Some(reader)),
                redirect_uri: config.redirect_uri().map(str::to_string),
            },
        ),
        CodeSource::Loopback(port) => (
            if port == 0 {
                InstalledFlowReturnMethod::HTTPRedirect
            } else {
                InstalledFlowReturnMethod::HTTPPortRedirect(port)
            },
            PromptDelegate {
                out: Arc::clone(&out),
                input: Mutex::new(None),
                redirect_uri: None,
            },
        ),
    };

    let storage = MemoryTokenStorage::default();
    let issued = opts
        .run("token.acquire", async {
            let auth = InstalledFlowAuthenticator::with_client(
                config.secret().clone(),
                method,
                https_client(),
            )
            .with_storage(Box::new(storage.clone()))
            .flow_delegate(Box::new(delegate))
            .build()
            .await
            .map_err(|e| {
                GSheetError::AuthExchange(format!("cannot start authorization flow: {e}"))
            })?;

            auth.token(&[config.scope()])
                .await
                .map_err(|e| GSheetError::AuthExchange(e.to_string()))?;

            storage.current().ok_or_else(|| {
                GSheetError::AuthExchange("token endpoint issued no token".to_string())
            })
        })
        .await?;

    let token = Token::from_token_info(&issued)?;
    let path = token_path.as_ref();
    let bytes = store::write_token(path, &token)?;

    // The prompt went to the operator, so the confirmation does too.
    if let Err(e) = writeln!(lock(&out), "Token saved to {}", path.display()) {
        tracing::debug!("Cannot confirm token save: {e}");
    }
    Ok(bytes)
}

/// Shows the authorization URL and, for pasted codes, reads the code back.
struct PromptDelegate {
    out: SharedWriter,
    input: Mutex<Option<Box<dyn BufRead + Send>>>,
    redirect_uri: Option<String>,
}

impl InstalledFlowDelegate for PromptDelegate {
    fn redirect_uri(&self) -> Option<&str> {
        self.redirect_uri.as_deref()
    }

    fn present_user_url<'a>(
        &'a self,
        url: &'a str,
        need_code: bool,
    ) -> Pin<Box<dyn Future<Output = std::result::Result<String, String>> + Send + 'a>> {
        Box::pin(async move {
            if let Err(e) = prompt(&self.out, url, need_code) {
                // Without the URL the operator cannot finish the flow.
                tracing::warn!("{e}");
                return Err(e);
            }
            if !need_code {
                return Ok(String::new());
            }

            let reader = lock(&self.input)
                .take()
                .ok_or_else(|| "authorization code was already read".to_string())?;
            read_console_code(reader).await
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn prompt(out: &SharedWriter, url: &str, need_code: bool) -> std::result::Result<(), String> {
    let instruction = if need_code {
        "Open this URL in a browser, authorize access, then paste the authorization code here:"
    } else {
        "Open this URL in a browser and authorize access:"
    };
    let mut out = lock(out);
    writeln!(out, "\n{url}\n\n{instruction}")
        .and_then(|()| out.flush())
        .map_err(|e| format!("cannot write prompt: {e}"))
}

/// Read one line on a plain thread so a blocked read never holds up runtime
/// shutdown after the flow is cancelled.
async fn read_console_code(
    mut reader: Box<dyn BufRead + Send>,
) -> std::result::Result<String, String> {
    let (tx, rx) = oneshot::channel();
    std::thread::spawn(move || {
        let mut line = String::new();
        let read = reader.read_line(&mut line).map(|_| line);
        if tx.send(read).is_err() {
            tracing::debug!("Authorization code arrived after the flow ended");
        }
    });

    let line = rx
        .await
        .map_err(|e| e.to_string())?
        .map_err(|e| format!("cannot read authorization code: {e}"))?;

    let code = line.trim();
    if code.is_empty() {
        return Err("no authorization code entered".to_string());
    }
    Ok(code.to_string())
}
