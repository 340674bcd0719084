//! Application state shared by every handler.

use docshift_core::Config;
use docshift_processing::{DocumentBuilder, TextExtractor, UploadValidator};
use docshift_storage::{LocalStorage, RetentionManager};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Process-wide readiness flag; cleared once shutdown begins
#[derive(Clone, Debug)]
pub struct Readiness(Arc<AtomicBool>);

impl Readiness {
    pub fn new() -> Self {
        Readiness(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_ready(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn begin_shutdown(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for Readiness {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Temporary uploaded PDFs
    pub uploads: LocalStorage,
    /// Generated documents awaiting download
    pub outputs: LocalStorage,
    pub retention: RetentionManager,
    pub validator: UploadValidator,
    pub extractor: Arc<dyn TextExtractor>,
    pub document_builder: DocumentBuilder,
    pub readiness: Readiness,
    /// Error responses include the error chain; set from `Config::is_development`
    pub expose_error_details: bool,
    pub started_at: Instant,
}
