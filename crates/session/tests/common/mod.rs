#![allow(dead_code)]

use gsheets_session::{SessionConfig, SheetSession};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const SPREADSHEET: &str = "abc";

/// Client-secret JSON whose token endpoint is the mock server.
pub fn credentials(server: &MockServer) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "installed": {
            "client_id": "cid",
            "client_secret": "secret",
            "auth_uri": format!("{}/auth", server.uri()),
            "token_uri": format!("{}/token", server.uri()),
            "redirect_uris": ["urn:ietf:wg:oauth:2.0:oob"]
        }
    }))
    .unwrap()
}

pub fn valid_token() -> Vec<u8> {
    br#"{"access_token":"good","token_type":"Bearer","refresh_token":"1//r","expiry":"2999-01-01T00:00:00Z"}"#
        .to_vec()
}

pub fn expired_token() -> Vec<u8> {
    br#"{"access_token":"stale","token_type":"Bearer","refresh_token":"1//r","expiry":"2001-01-01T00:00:00Z"}"#
        .to_vec()
}

pub fn config(server: &MockServer) -> SessionConfig {
    SessionConfig::default().with_api_base(format!("{}/", server.uri()))
}

/// A read/write session on [`SPREADSHEET`] pointed at the mock server.
pub async fn session(server: &MockServer) -> SheetSession {
    session_with_token(server, &valid_token()).await
}

pub async fn session_with_token(server: &MockServer, token: &[u8]) -> SheetSession {
    SheetSession::with_config(&credentials(server), token, SPREADSHEET, false, config(server))
        .await
        .expect("session")
}

/// Metadata for `[{0, 111, "Sheet1"}, {1, 222, "Sheet2"}]`. The first sheet
/// omits its zero index, as the service does.
pub fn two_sheets() -> Value {
    json!({
        "spreadsheetId": SPREADSHEET,
        "sheets": [
            {"properties": {"sheetId": 111, "title": "Sheet1", "sheetType": "GRID"}},
            {"properties": {"sheetId": 222, "title": "Sheet2", "index": 1, "sheetType": "GRID"}}
        ]
    })
}

pub fn api_error(code: u16, message: &str, status: &str) -> Value {
    json!({"error": {"code": code, "message": message, "status": status}})
}
