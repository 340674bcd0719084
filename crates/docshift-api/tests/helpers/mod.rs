//! Test helpers: build AppState and router for integration tests.
//!
//! Every test app gets its own temporary upload, output and static
//! directories, so tests can run in parallel.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::TestServer;
use bytes::Bytes;
use docshift_api::setup::{build_state, routes};
use docshift_api::AppState;
use docshift_core::{Config, ConverterConfig};
use docshift_processing::{ExtractedText, PdfTextExtractor, TextExtractor};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Extractor returning fixed text, whatever the bytes
pub struct StubExtractor(pub String);

#[async_trait::async_trait]
impl TextExtractor for StubExtractor {
    async fn extract(&self, _data: Bytes) -> ExtractedText {
        ExtractedText::Text(self.0.clone())
    }
}

/// Test application: server, state and owned directories.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub upload_dir: PathBuf,
    pub output_dir: PathBuf,
    pub static_dir: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn files_in(dir: &PathBuf) -> Vec<String> {
        std::fs::read_dir(dir)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn uploads(&self) -> Vec<String> {
        Self::files_in(&self.upload_dir)
    }

    pub fn outputs(&self) -> Vec<String> {
        Self::files_in(&self.output_dir)
    }
}

/// Config pointing at the temp directories, with short retention delays
pub fn test_config(temp_dir: &TempDir) -> ConverterConfig {
    ConverterConfig {
        upload_dir: temp_dir.path().join("uploads"),
        output_dir: temp_dir.path().join("output"),
        static_dir: temp_dir.path().join("public"),
        upload_retention: Duration::from_millis(50),
        output_retention: Duration::from_millis(200),
        orphan_sweep_interval: Duration::ZERO,
        ..ConverterConfig::default()
    }
}

pub async fn setup_test_app_with(
    extractor: Arc<dyn TextExtractor>,
    customize: impl FnOnce(&mut ConverterConfig),
) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut converter = test_config(&temp_dir);
    customize(&mut converter);

    std::fs::create_dir_all(&converter.static_dir).expect("Failed to create static dir");
    std::fs::write(
        converter.static_dir.join("index.html"),
        "<!doctype html><title>PDF to Word</title><div id=\"upload\"></div>",
    )
    .expect("Failed to write index.html");

    let upload_dir = converter.upload_dir.clone();
    let output_dir = converter.output_dir.clone();
    let static_dir = converter.static_dir.clone();
    let config = Config::from(converter);

    let state = build_state(config.clone(), extractor)
        .await
        .expect("Failed to build state");
    let router = routes::setup_routes(&config, state.clone()).expect("Failed to setup routes");
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        state,
        upload_dir,
        output_dir,
        static_dir,
        _temp_dir: temp_dir,
    }
}

/// App whose extractor always yields "Hello\nWorld"
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(Arc::new(StubExtractor("Hello\nWorld".to_string())), |_| {}).await
}

/// App running the real pdf-extract backed extractor
pub async fn setup_pdf_test_app() -> TestApp {
    setup_test_app_with(Arc::new(PdfTextExtractor::new()), |_| {}).await
}
