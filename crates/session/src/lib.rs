//! # gsheets-session
//!
//! An authenticated session over the Google Sheets v4 API.
//!
//! [`SheetSession`] is built from raw credential and token bytes and bound to
//! one spreadsheet. Its methods map one-to-one onto calls of the
//! `google-sheets4` hub: reads, the four write variants, clear, rename/hide
//! by GID, copy-paste, and copying sheets between spreadsheets. Nothing is
//! cached and nothing is retried.
//!
//! ```no_run
//! use gsheets_core::CallOptions;
//! use gsheets_session::SheetSession;
//! use serde_json::json;
//! use std::time::Duration;
//!
//! # async fn run() -> gsheets_core::Result<()> {
//! let credentials = std::fs::read("credentials.json").unwrap();
//! let token = std::fs::read("token.json").unwrap();
//! let session = SheetSession::new(&credentials, &token, "1AbC...", false).await?;
//!
//! let opts = CallOptions::new().with_deadline(Duration::from_secs(10));
//! session
//!     .update_values("Sheet1!A1:B1", &[vec![json!("AAA"), json!("BBB")]], &opts)
//!     .await?;
//! let values = session.read_values("Sheet1!A1:B1", &opts).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod properties;
mod service;
mod session;

pub use config::{SessionConfig, DEFAULT_API_BASE};
pub use google_sheets4::api::{
    AppendValuesResponse, BatchUpdateSpreadsheetResponse, ClearValuesResponse, SheetProperties,
    UpdateValuesResponse, ValueRange,
};
pub use properties::SheetPropertiesExt;
pub use session::SheetSession;
