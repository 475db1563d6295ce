//! Fetching workbooks from a mock HTTP server.

use sheetbind_core::{Decoder, MapError, TableSink};
use sheetbind_http::{fetch_bytes, read_from_url, HttpError, HttpSource};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

sheetbind_core::record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Contact {
        id: String => "ID",
        name: String => "姓名",
    }
}

fn contacts() -> Vec<Contact> {
    vec![
        Contact {
            id: "1".to_string(),
            name: "赵".to_string(),
        },
        Contact {
            id: "2".to_string(),
            name: "钱".to_string(),
        },
    ]
}

async fn serve_workbook(server: &MockServer, route: &str, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_read_from_url() {
    let server = MockServer::start().await;
    let body = sheetbind_xlsx::export(&contacts())
        .unwrap()
        .serialize()
        .unwrap();
    serve_workbook(&server, "/contacts.xlsx", body).await;

    let url = format!("{}/contacts.xlsx", server.uri());
    let result: Vec<Contact> = read_from_url(&url).await.unwrap();
    assert_eq!(result, contacts());
}

#[tokio::test]
async fn test_fetch_bytes_passthrough() {
    let server = MockServer::start().await;
    serve_workbook(&server, "/raw", b"raw bytes".to_vec()).await;

    let bytes = fetch_bytes(&format!("{}/raw", server.uri())).await.unwrap();
    assert_eq!(bytes, b"raw bytes");
}

#[tokio::test]
async fn test_not_found_is_backend_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.xlsx"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/missing.xlsx", server.uri());
    let err = read_from_url::<Contact>(&url).await.unwrap_err();
    let MapError::Backend(inner) = err else {
        panic!("expected backend error");
    };
    assert!(matches!(
        inner.downcast_ref::<HttpError>(),
        Some(HttpError::Status { status: 404, .. })
    ));
}

#[tokio::test]
async fn test_body_is_not_a_workbook() {
    let server = MockServer::start().await;
    serve_workbook(&server, "/page.html", b"<html></html>".to_vec()).await;

    let url = format!("{}/page.html", server.uri());
    let err = read_from_url::<Contact>(&url).await.unwrap_err();
    assert!(matches!(err, MapError::Backend(_)));
}

#[tokio::test]
async fn test_read_with_reporter() {
    let server = MockServer::start().await;
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "ID").unwrap();
    sheet.write_string(0, 1, "Unexpected").unwrap();
    sheet.write_string(1, 0, "9").unwrap();
    let body = workbook.save_to_buffer().unwrap();
    serve_workbook(&server, "/extra.xlsx", body).await;

    let source = HttpSource::with_timeout(5).unwrap();
    let mut warnings = Vec::new();
    let mut decoder = Decoder::with_reporter(|w| warnings.push(w.to_string()));
    let result: Vec<Contact> = source
        .read_with(&mut decoder, &format!("{}/extra.xlsx", server.uri()))
        .await
        .unwrap();
    drop(decoder);

    assert_eq!(result[0].id, "9");
    assert_eq!(warnings, vec!["unknown column header \"Unexpected\" in column B"]);
}
