//! Conversion orchestrator
//!
//! Drives one upload through validate → extract → normalize → build →
//! persist. The temporary upload is always scheduled for deletion once the
//! request finishes, whichever stage it ends in.

use crate::error::{document_write_error, storage_error, validation_error};
use crate::state::AppState;
use crate::utils::upload::{sanitize_filename, temp_upload_name, UPLOAD_FIELD};
use docshift_core::{AppError, ConversionResult, ConvertedDocument, UploadedFile};
use docshift_processing::{normalize_text, CandidateFile};
use rand::Rng;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStage {
    Received,
    Validated,
    Extracted,
    Normalized,
    Built,
    Persisted,
    Responded,
    Failed,
}

impl ConversionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionStage::Received => "received",
            ConversionStage::Validated => "validated",
            ConversionStage::Extracted => "extracted",
            ConversionStage::Normalized => "normalized",
            ConversionStage::Built => "built",
            ConversionStage::Persisted => "persisted",
            ConversionStage::Responded => "responded",
            ConversionStage::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ConversionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct ConversionService<'a> {
    state: &'a AppState,
}

impl<'a> ConversionService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Run the whole pipeline for one submission
    pub async fn convert(&self, files: Vec<CandidateFile>) -> Result<ConversionResult, AppError> {
        let start = Instant::now();
        let mut stage = ConversionStage::Received;
        tracing::debug!(stage = %stage, parts = files.len(), "Conversion received");

        match self.run(files, &mut stage).await {
            Ok(result) => {
                tracing::info!(
                    stage = %ConversionStage::Responded,
                    download_url = %result.download_url,
                    original_name = %result.original_name,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Conversion completed"
                );
                Ok(result)
            }
            Err(e) => {
                tracing::warn!(
                    stage = %ConversionStage::Failed,
                    failed_after = %stage,
                    error = %e,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Conversion failed"
                );
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        files: Vec<CandidateFile>,
        stage: &mut ConversionStage,
    ) -> Result<ConversionResult, AppError> {
        let state = self.state;

        let candidate = state.validator.validate(&files).map_err(validation_error)?;
        let original_filename = sanitize_filename(candidate.filename.as_deref());

        let temp_name = temp_upload_name(UPLOAD_FIELD, &original_filename);
        let temp_path = state.uploads.key_to_path(&temp_name).map_err(storage_error)?;
        // Armed before the write so a partial file is removed as well
        let _upload_cleanup = state.retention.upload_guard(temp_path.clone());
        state
            .uploads
            .write_new(&temp_name, &candidate.data)
            .await
            .map_err(storage_error)?;

        let upload = UploadedFile {
            temp_path,
            original_filename,
            content_type: candidate.content_type.clone().unwrap_or_default(),
            size_bytes: candidate.data.len(),
        };
        *stage = ConversionStage::Validated;
        tracing::debug!(
            stage = %stage,
            temp_path = %upload.temp_path.display(),
            size_bytes = upload.size_bytes,
            content_type = %upload.content_type,
            "Upload admitted"
        );

        let extracted = state.extractor.extract(candidate.data.clone()).await;
        *stage = ConversionStage::Extracted;
        tracing::debug!(
            stage = %stage,
            fallback = extracted.is_fallback(),
            text_len = extracted.as_str().len(),
            "Text extracted"
        );

        let text = normalize_text(Some(extracted.as_str()));
        *stage = ConversionStage::Normalized;
        tracing::debug!(stage = %stage, text_len = text.len(), "Text normalized");

        let bytes = state
            .document_builder
            .render(&text, &upload.original_filename)
            .map_err(document_write_error)?;
        *stage = ConversionStage::Built;
        tracing::debug!(stage = %stage, size_bytes = bytes.len(), "Document built");

        let filename = generate_output_filename();
        let path = state.outputs.key_to_path(&filename).map_err(storage_error)?;
        let size_bytes = state
            .document_builder
            .persist(&bytes, &path)
            .await
            .map_err(document_write_error)?;
        let document = ConvertedDocument {
            path,
            filename,
            size_bytes,
        };
        *stage = ConversionStage::Persisted;
        tracing::debug!(
            stage = %stage,
            path = %document.path.display(),
            size_bytes = document.size_bytes,
            "Document persisted"
        );

        Ok(ConversionResult::completed(
            &document,
            upload.original_filename,
        ))
    }
}

/// `converted-<millis><6 random digits>.docx`
fn generate_output_filename() -> String {
    let millis = chrono::Utc::now().timestamp_millis().unsigned_abs();
    let suffix: u32 = rand::rng().random_range(0..1_000_000);
    ConvertedDocument::filename_for(millis, suffix)
}
