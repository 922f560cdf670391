use crate::token::Token;
use gsheets_core::{GSheetError, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Write `token` to `path`, replacing any previous token, and return the bytes
/// read back from the file.
///
/// The file is created if missing and truncated otherwise; on unix it is
/// readable by the owner only.
///
/// # Errors
///
/// Returns `GSheetError::TokenWrite` if the file cannot be created, written or
/// read back.
pub fn write_token(path: impl AsRef<Path>, token: &Token) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let fail = |e: std::io::Error| GSheetError::token_write(path.display().to_string(), e.to_string());

    let mut options = OpenOptions::new();
    options.read(true).write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path).map_err(fail)?;
    let json = serde_json::to_vec(token)
        .map_err(|e| GSheetError::token_write(path.display().to_string(), e.to_string()))?;
    file.write_all(&json).map_err(fail)?;
    file.write_all(b"\n").map_err(fail)?;
    file.sync_all().map_err(fail)?;
    drop(file);

    tracing::info!("Saved token to {}", path.display());
    fs::read(path).map_err(fail)
}
