mod common;
use common::*;

use gsheets_core::{CallOptions, GSheetError, SheetKey};
use gsheets_session::SheetPropertiesExt;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_two_sheets(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/abc"))
        .and(query_param("fields", "spreadsheetId,sheets.properties"))
        .and(header("authorization", "Bearer good"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_sheets()))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_resolve_between_index_gid_and_name() {
    let server = MockServer::start().await;
    // Every lookup is a fresh metadata fetch.
    mount_two_sheets(&server, 4).await;

    let session = session(&server).await;
    let opts = CallOptions::new();

    assert_eq!(session.gid_by_index(0, &opts).await.unwrap(), 111);
    assert_eq!(session.name_by_gid(222, &opts).await.unwrap(), "Sheet2");
    assert_eq!(session.gid_by_name("Sheet1", &opts).await.unwrap(), 111);
    assert_eq!(session.name_by_index(1, &opts).await.unwrap(), "Sheet2");
}

#[tokio::test]
async fn test_unknown_keys_are_sheet_not_found() {
    let server = MockServer::start().await;
    mount_two_sheets(&server, 3).await;

    let session = session(&server).await;
    let opts = CallOptions::new();

    let err = session.gid_by_index(5, &opts).await.unwrap_err();
    assert!(matches!(
        err,
        GSheetError::SheetNotFound { key: SheetKey::Index(5), ref spreadsheet_id }
            if spreadsheet_id == "abc"
    ));

    let err = session.name_by_gid(333, &opts).await.unwrap_err();
    assert!(matches!(err, GSheetError::SheetNotFound { key: SheetKey::Gid(333), .. }));

    let err = session.gid_by_name("sheet1", &opts).await.unwrap_err();
    assert!(matches!(
        err,
        GSheetError::SheetNotFound { key: SheetKey::Name(ref name), .. } if name == "sheet1"
    ));
}

#[tokio::test]
async fn test_first_matching_title_wins() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "sheets": [
                {"properties": {"sheetId": 1, "title": "Dup"}},
                {"properties": {"sheetId": 2, "title": "Dup", "index": 1}}
            ]
        })))
        .mount(&server)
        .await;

    let session = session(&server).await;
    assert_eq!(
        session.gid_by_name("Dup", &CallOptions::new()).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn test_metadata_failure_is_spreadsheet_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/abc"))
        .respond_with(ResponseTemplate::new(404).set_body_json(api_error(
            404,
            "Requested entity was not found.",
            "NOT_FOUND",
        )))
        .mount(&server)
        .await;

    let session = session(&server).await;
    let err = session
        .gid_by_name("Sheet1", &CallOptions::new())
        .await
        .unwrap_err();

    match err {
        GSheetError::SpreadsheetNotFound {
            spreadsheet_id,
            message,
        } => {
            assert_eq!(spreadsheet_id, "abc");
            assert_eq!(message, "Requested entity was not found.");
        }
        other => panic!("expected SpreadsheetNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_permission_denied_is_spreadsheet_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/abc"))
        .respond_with(ResponseTemplate::new(403).set_body_json(api_error(
            403,
            "The caller does not have permission",
            "PERMISSION_DENIED",
        )))
        .mount(&server)
        .await;

    let session = session(&server).await;
    let err = session.sheets(&CallOptions::new()).await.unwrap_err();
    assert!(matches!(err, GSheetError::SpreadsheetNotFound { .. }));
}

#[tokio::test]
async fn test_sheets_lists_properties_in_order() {
    let server = MockServer::start().await;
    mount_two_sheets(&server, 1).await;

    let sheets = session(&server)
        .await
        .sheets(&CallOptions::new())
        .await
        .unwrap();
    let summary: Vec<_> = sheets
        .iter()
        .map(|p| (p.position(), p.gid(), p.title_str().to_string()))
        .collect();
    assert_eq!(
        summary,
        vec![(0, 111, "Sheet1".to_string()), (1, 222, "Sheet2".to_string())]
    );
}
