//! Application setup and initialization

pub mod routes;
pub mod server;

use crate::state::{AppState, Readiness};
use anyhow::{Context, Result};
use docshift_core::{ConvertedDocument, Config};
use docshift_infra::LogFormat;
use docshift_processing::{DocumentBuilder, PdfTextExtractor, TextExtractor, UploadValidator};
use docshift_storage::{LocalStorage, OrphanSweeper, RetentionManager};
use std::sync::Arc;
use std::time::Instant;

use crate::utils::upload::UPLOAD_FIELD;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    docshift_infra::init_telemetry(LogFormat::from_name(config.log_format()))
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let state = build_state(config.clone(), Arc::new(PdfTextExtractor::new())).await?;
    start_sweepers(&state);

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}

/// Create the working directories and assemble the shared state
pub async fn build_state(
    config: Config,
    extractor: Arc<dyn TextExtractor>,
) -> Result<Arc<AppState>> {
    let uploads = LocalStorage::new(config.upload_dir())
        .await
        .context("Failed to prepare upload directory")?;
    let outputs = LocalStorage::new(config.output_dir())
        .await
        .context("Failed to prepare output directory")?;

    let retention = RetentionManager::new(config.upload_retention(), config.output_retention());
    let validator = UploadValidator::new(
        config.max_upload_size_bytes(),
        config.allowed_content_types().to_vec(),
    );

    let expose_error_details = config.is_development();

    Ok(Arc::new(AppState {
        config,
        uploads,
        outputs,
        retention,
        validator,
        extractor,
        document_builder: DocumentBuilder::new(),
        readiness: Readiness::new(),
        expose_error_details,
        started_at: Instant::now(),
    }))
}

fn is_temp_upload(name: &str) -> bool {
    name.strip_prefix(UPLOAD_FIELD)
        .is_some_and(|rest| rest.starts_with('-'))
}

/// Background sweeps for outputs nobody downloaded and uploads left behind by a crash
pub fn start_sweepers(state: &AppState) {
    let every = state.config.orphan_sweep_interval();
    let max_age = state.config.orphan_max_age();

    Arc::new(OrphanSweeper::new(
        state.outputs.clone(),
        max_age,
        ConvertedDocument::is_valid_filename,
    ))
    .start(every);

    Arc::new(OrphanSweeper::new(
        state.uploads.clone(),
        max_age,
        is_temp_upload,
    ))
    .start(every);

    if !every.is_zero() {
        tracing::info!(
            interval_secs = every.as_secs(),
            max_age_secs = max_age.as_secs(),
            "Orphan sweepers started"
        );
    }
}
