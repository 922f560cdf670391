//! Error types for gsheets.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result type for gsheets operations.
pub type Result<T> = std::result::Result<T, GSheetError>;

/// The key a sheet lookup was made with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetKey {
    /// 0-based position of the sheet in the spreadsheet.
    Index(i32),
    /// Stable numeric sheet id (the `gid` in sheet URLs).
    Gid(i32),
    /// Display title.
    Name(String),
}

impl fmt::Display for SheetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "index {index}"),
            Self::Gid(gid) => write!(f, "gid {gid}"),
            Self::Name(name) => write!(f, "name '{name}'"),
        }
    }
}

/// Follow-up step of a cross-spreadsheet copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStep {
    /// Renaming the copied sheet.
    Rename,
    /// Making the copied sheet visible.
    Unhide,
}

impl fmt::Display for CopyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rename => f.write_str("rename"),
            Self::Unhide => f.write_str("unhide"),
        }
    }
}

/// Errors that can occur in gsheets.
#[derive(Debug, Error)]
pub enum GSheetError {
    /// Application credentials could not be parsed.
    #[error("Invalid application credentials: {0}")]
    ConfigParse(String),

    /// Account token could not be parsed.
    #[error("Invalid account token: {0}")]
    TokenParse(String),

    /// The authenticated service client could not be built.
    #[error("Failed to initialize Sheets service: {0}")]
    ServiceInit(String),

    /// Exchanging an authorization code for a token failed.
    #[error("Authorization code exchange failed: {0}")]
    AuthExchange(String),

    /// The token file could not be written.
    #[error("Failed to write token to '{path}': {message}")]
    TokenWrite { path: String, message: String },

    /// Spreadsheet metadata could not be fetched.
    #[error("Spreadsheet '{spreadsheet_id}' not found or not accessible: {message}")]
    SpreadsheetNotFound {
        spreadsheet_id: String,
        message: String,
    },

    /// Metadata was fetched but no sheet matched.
    #[error("Sheet with {key} not found in spreadsheet '{spreadsheet_id}'")]
    SheetNotFound {
        spreadsheet_id: String,
        key: SheetKey,
    },

    /// A matrix had the wrong shape.
    #[error("Shape error: {0}")]
    Shape(String),

    /// The remote service rejected a call or could not be reached.
    #[error("{operation} on {target} failed{}: {message}", status_suffix(.status))]
    RemoteCall {
        operation: &'static str,
        target: String,
        status: Option<u16>,
        message: String,
    },

    /// A sheet was copied but a follow-up step failed.
    #[error("Sheet {sheet_id} was copied into '{spreadsheet_id}' but the {step} step failed: {source}")]
    CopyIncomplete {
        step: CopyStep,
        spreadsheet_id: String,
        sheet_id: i32,
        source: Box<GSheetError>,
    },

    /// The call did not finish before its deadline.
    #[error("{operation} exceeded its deadline of {deadline:?}")]
    Deadline {
        operation: &'static str,
        deadline: Duration,
    },

    /// The call was cancelled by the caller.
    #[error("{operation} was cancelled")]
    Cancelled { operation: &'static str },
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl GSheetError {
    /// Create a remote call error.
    pub fn remote(
        operation: &'static str,
        target: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self::RemoteCall {
            operation,
            target: target.into(),
            status,
            message: message.into(),
        }
    }

    /// Create a token write error.
    pub fn token_write(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TokenWrite {
            path: path.into(),
            message: message.into(),
        }
    }

    /// HTTP status of a remote failure, if the service answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteCall { status, .. } => *status,
            Self::CopyIncomplete { source, .. } => source.status(),
            _ => None,
        }
    }
}
