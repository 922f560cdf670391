mod common;
use common::*;

use gsheets_core::{CallOptions, CellPosition, CellSpan, CopyStep, GSheetError};
use gsheets_session::SheetPropertiesExt;
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, method, path};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

const BATCH_PATH: &str = "/v4/spreadsheets/abc:batchUpdate";

fn batch_ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"spreadsheetId": "abc", "replies": [{}]}))
}

#[tokio::test]
async fn test_rename_patches_only_title() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(BATCH_PATH))
        .and(body_json(json!({
            "requests": [{
                "updateSheetProperties": {
                    "properties": {"sheetId": 222, "title": "Summary"},
                    "fields": "title"
                }
            }]
        })))
        .respond_with(batch_ok())
        .expect(1)
        .mount(&server)
        .await;

    let response = session(&server)
        .await
        .rename_sheet(222, "Summary", &CallOptions::new())
        .await
        .unwrap();
    assert_eq!(response.spreadsheet_id.as_deref(), Some("abc"));
    assert_eq!(response.replies.map(|replies| replies.len()), Some(1));
}

#[tokio::test]
async fn test_hide_and_unhide_patch_only_hidden() {
    let server = MockServer::start().await;
    for hidden in [true, false] {
        Mock::given(method("POST"))
            .and(path(BATCH_PATH))
            .and(body_json(json!({
                "requests": [{
                    "updateSheetProperties": {
                        "properties": {"sheetId": 111, "hidden": hidden},
                        "fields": "hidden"
                    }
                }]
            })))
            .respond_with(batch_ok())
            .expect(1)
            .mount(&server)
            .await;
    }

    let session = session(&server).await;
    let opts = CallOptions::new();
    session.set_sheet_hidden(111, true, &opts).await.unwrap();
    session.set_sheet_hidden(111, false, &opts).await.unwrap();
}

#[tokio::test]
async fn test_copy_paste_converts_positions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(BATCH_PATH))
        .and(body_json(json!({
            "requests": [{
                "copyPaste": {
                    "source": {
                        "sheetId": 111,
                        "startRowIndex": 0,
                        "endRowIndex": 3,
                        "startColumnIndex": 0,
                        "endColumnIndex": 2
                    },
                    "destination": {
                        "sheetId": 222,
                        "startRowIndex": 4,
                        "endRowIndex": 5,
                        "startColumnIndex": 3,
                        "endColumnIndex": 4
                    },
                    "pasteType": "PASTE_NORMAL",
                    "pasteOrientation": "NORMAL"
                }
            }]
        })))
        .respond_with(batch_ok())
        .expect(1)
        .mount(&server)
        .await;

    // A1:B3 on 111 -> D5 on 222
    let source = CellSpan::new(CellPosition::new(1, 1), CellPosition::new(3, 2));
    let dest = CellSpan::single(CellPosition::new(5, 4));
    session(&server)
        .await
        .copy_paste(111, 222, source, dest, true, &CallOptions::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_copy_paste_formulas_only() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(BATCH_PATH))
        .and(body_string_contains("\"pasteType\":\"PASTE_FORMULA\""))
        .respond_with(batch_ok())
        .expect(1)
        .mount(&server)
        .await;

    let span = CellSpan::single(CellPosition::new(1, 1));
    session(&server)
        .await
        .copy_paste(111, 111, span, span, false, &CallOptions::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_copy_sheet_to_other_spreadsheet() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/src/sheets/7:copyTo"))
        .and(body_json(json!({"destinationSpreadsheetId": "dest"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sheetId": 999,
            "title": "Copy of Data",
            "index": 3,
            "sheetType": "GRID"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let copied = session(&server)
        .await
        .copy_sheet_to("src", 7, "dest", &CallOptions::new())
        .await
        .unwrap();
    assert_eq!(copied.gid(), 999);
    assert_eq!(copied.title_str(), "Copy of Data");
    assert_eq!(copied.position(), 3);
}

async fn mount_copy_into_bound(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/src/sheets/7:copyTo"))
        .and(body_json(json!({"destinationSpreadsheetId": "abc"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sheetId": 999,
            "title": "Copy of Data",
            "hidden": true
        })))
        .expect(1)
        .mount(server)
        .await;
}

fn rename_step() -> MockBuilder {
    Mock::given(method("POST"))
        .and(path(BATCH_PATH))
        .and(body_string_contains("\"fields\":\"title\""))
        .and(body_string_contains("\"title\":\"Imported\""))
}

fn unhide_step() -> MockBuilder {
    Mock::given(method("POST"))
        .and(path(BATCH_PATH))
        .and(body_string_contains("\"fields\":\"hidden\""))
        .and(body_string_contains("\"hidden\":false"))
}

#[tokio::test]
async fn test_copy_sheet_from_renames_and_unhides() {
    let server = MockServer::start().await;
    mount_copy_into_bound(&server).await;
    rename_step()
        .respond_with(batch_ok())
        .expect(1)
        .mount(&server)
        .await;
    unhide_step()
        .respond_with(batch_ok())
        .expect(1)
        .mount(&server)
        .await;

    let copied = session(&server)
        .await
        .copy_sheet_from("src", 7, Some("Imported"), &CallOptions::new())
        .await
        .unwrap();
    assert_eq!(copied.gid(), 999);
    assert_eq!(copied.title_str(), "Imported");
    assert!(!copied.is_hidden());
}

#[tokio::test]
async fn test_copy_sheet_from_without_name_is_single_call() {
    let server = MockServer::start().await;
    mount_copy_into_bound(&server).await;
    Mock::given(method("POST"))
        .and(path(BATCH_PATH))
        .respond_with(batch_ok())
        .expect(0)
        .mount(&server)
        .await;

    let copied = session(&server)
        .await
        .copy_sheet_from("src", 7, None, &CallOptions::new())
        .await
        .unwrap();
    assert_eq!(copied.title_str(), "Copy of Data");
    assert!(copied.is_hidden());
}

#[tokio::test]
async fn test_copy_sheet_from_rename_failure_is_reported_as_rename_step() {
    let server = MockServer::start().await;
    mount_copy_into_bound(&server).await;
    rename_step()
        .respond_with(ResponseTemplate::new(400).set_body_json(api_error(
            400,
            "A sheet with the name \"Imported\" already exists.",
            "INVALID_ARGUMENT",
        )))
        .expect(1)
        .mount(&server)
        .await;
    unhide_step()
        .respond_with(batch_ok())
        .expect(0)
        .mount(&server)
        .await;

    let err = session(&server)
        .await
        .copy_sheet_from("src", 7, Some("Imported"), &CallOptions::new())
        .await
        .unwrap_err();

    match err {
        GSheetError::CopyIncomplete {
            step,
            spreadsheet_id,
            sheet_id,
            source,
        } => {
            assert_eq!(step, CopyStep::Rename);
            assert_eq!(spreadsheet_id, "abc");
            assert_eq!(sheet_id, 999);
            assert!(source.to_string().contains("already exists"));
        }
        other => panic!("expected CopyIncomplete, got {other:?}"),
    }
}

#[tokio::test]
async fn test_copy_sheet_from_unhide_failure_is_reported_as_unhide_step() {
    let server = MockServer::start().await;
    mount_copy_into_bound(&server).await;
    rename_step()
        .respond_with(batch_ok())
        .expect(1)
        .mount(&server)
        .await;
    unhide_step()
        .respond_with(ResponseTemplate::new(503).set_body_json(api_error(
            503,
            "The service is currently unavailable.",
            "UNAVAILABLE",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let err = session(&server)
        .await
        .copy_sheet_from("src", 7, Some("Imported"), &CallOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        GSheetError::CopyIncomplete { step: CopyStep::Unhide, sheet_id: 999, .. }
    ));
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_copy_sheet_from_copy_failure_is_plain_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/src/sheets/7:copyTo"))
        .respond_with(ResponseTemplate::new(404).set_body_json(api_error(
            404,
            "Requested entity was not found.",
            "NOT_FOUND",
        )))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(BATCH_PATH))
        .respond_with(batch_ok())
        .expect(0)
        .mount(&server)
        .await;

    let err = session(&server)
        .await
        .copy_sheet_from("src", 7, Some("Imported"), &CallOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GSheetError::RemoteCall { operation: "sheets.copyTo", status: Some(404), .. }
    ));
}
