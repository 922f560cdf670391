//! # gsheets-auth
//!
//! OAuth2 support for the Google Sheets API, built on the `yup-oauth2`
//! authenticator that `google-sheets4` re-exports.
//!
//! This crate provides:
//! - Parsing of "installed application" (or "web") client-secret files
//! - The token model and its on-disk JSON form
//! - The session authenticator: serves the stored token and refreshes it,
//!   never prompting
//! - Interactive token acquisition for command-line tools
//!
//! ## Example
//!
//! ```no_run
//! use gsheets_auth::{acquire_token, CodeSource};
//! use gsheets_core::CallOptions;
//!
//! # async fn run() -> gsheets_core::Result<()> {
//! let credentials = std::fs::read("credentials.json").unwrap();
//! let token = acquire_token(
//!     &credentials,
//!     "token.json",
//!     false,
//!     CodeSource::stdin(),
//!     std::io::stdout(),
//!     &CallOptions::new(),
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

mod authenticator;
mod client;
mod credentials;
mod interactive;
mod storage;
mod store;
mod token;

pub use authenticator::{access_token, session_authenticator};
pub use client::{https_client, Connector, HttpClient, SessionAuthenticator};
pub use credentials::{OAuthConfig, SCOPE_SPREADSHEETS, SCOPE_SPREADSHEETS_READONLY};
pub use interactive::{acquire_token, CodeSource};
pub use store::write_token;
pub use token::Token;
