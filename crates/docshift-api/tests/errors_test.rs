//! Error body rendering across environments and request timeouts.
//!
//! Run with: `cargo test -p docshift-api --test errors_test`

mod helpers;

use bytes::Bytes;
use docshift_processing::{ExtractedText, TextExtractor};
use helpers::fixtures::{convert, pdf_form};
use helpers::{setup_test_app_with, StubExtractor};
use std::sync::Arc;
use std::time::Duration;

/// Extractor that takes longer than any test timeout
struct SlowExtractor(Duration);

#[async_trait::async_trait]
impl TextExtractor for SlowExtractor {
    async fn extract(&self, _data: Bytes) -> ExtractedText {
        tokio::time::sleep(self.0).await;
        ExtractedText::Text("too late".to_string())
    }
}

fn stub() -> Arc<dyn TextExtractor> {
    Arc::new(StubExtractor("Hello\nWorld".to_string()))
}

#[tokio::test]
async fn test_development_errors_include_details() {
    let app = setup_test_app_with(stub(), |_| {}).await;
    std::fs::remove_dir_all(&app.output_dir).unwrap();

    let (status, body) = convert(app.client(), pdf_form(b"%PDF".to_vec(), "report.pdf")).await;

    assert_eq!(status, 500);
    assert_eq!(body["code"], "DOCUMENT_WRITE_ERROR");
    assert_eq!(body["error"], "Failed to generate Word document");
    let details = body["details"].as_str().expect("details in development");
    assert!(details.contains("Document write error"), "details: {}", details);
}

#[tokio::test]
async fn test_production_errors_hide_details() {
    let app = setup_test_app_with(stub(), |config| {
        config.base.environment = "production".to_string();
        config.base.cors_origins = vec!["https://convert.example.com".to_string()];
    })
    .await;
    std::fs::remove_dir_all(&app.output_dir).unwrap();

    let (status, body) = convert(app.client(), pdf_form(b"%PDF".to_vec(), "report.pdf")).await;

    assert_eq!(status, 500);
    assert_eq!(body["code"], "DOCUMENT_WRITE_ERROR");
    assert_eq!(body["error"], "Failed to generate Word document");
    assert!(body.get("details").is_none(), "unexpected details: {}", body);
}

#[tokio::test]
async fn test_production_validation_errors_hide_details() {
    let app = setup_test_app_with(stub(), |config| {
        config.base.environment = "production".to_string();
        config.base.cors_origins = vec!["https://convert.example.com".to_string()];
    })
    .await;

    let response = app.client().get("/download/converted-abc.docx").await;

    assert_eq!(response.status_code().as_u16(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Invalid filename");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_timed_out_request_gets_json_error() {
    let app = setup_test_app_with(Arc::new(SlowExtractor(Duration::from_secs(2))), |config| {
        config.base.request_timeout = Duration::from_millis(200);
    })
    .await;

    let response = app
        .client()
        .post("/convert")
        .multipart(pdf_form(b"%PDF".to_vec(), "slow.pdf"))
        .await;

    assert_eq!(response.status_code().as_u16(), 408);
    assert!(response
        .header("content-type")
        .to_str()
        .unwrap()
        .starts_with("application/json"));
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Request timed out");
    assert_eq!(body["code"], "REQUEST_TIMEOUT");
    assert!(!response.header("x-request-id").is_empty());

    // The abandoned conversion still cleans up its upload
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(app.uploads().is_empty(), "leftover uploads: {:?}", app.uploads());
    assert!(app.outputs().is_empty());
}
