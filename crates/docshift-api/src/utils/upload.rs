//! Multipart upload reading and temporary file naming

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::BytesMut;
use docshift_core::AppError;
use docshift_processing::{CandidateFile, UploadValidator, ValidationError};
use rand::Rng;

use crate::error::validation_error;

/// Multipart field carrying the PDF
pub const UPLOAD_FIELD: &str = "pdfFile";

const DEFAULT_EXTENSION: &str = "pdf";
const MAX_EXTENSION_LEN: usize = 10;

fn multipart_error(err: MultipartError, max_size: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return validation_error(ValidationError::FileTooLarge {
            size: max_size + 1,
            max: max_size,
        });
    }
    AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
}

/// Collect the file parts of `field_name`.
///
/// Other fields are skipped and blank parts dropped. Reading stops as soon as
/// a file grows past `max_size` or a second file shows up.
pub async fn read_upload_parts(
    mut multipart: Multipart,
    field_name: &str,
    max_size: usize,
) -> Result<Vec<CandidateFile>, AppError> {
    let mut files = Vec::new();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_size))?
    {
        if field.name() != Some(field_name) {
            tracing::debug!(field = ?field.name(), "Skipping unexpected multipart field");
            continue;
        }

        let filename = field.file_name().map(|s| s.to_string());
        let content_type = field.content_type().map(|s| s.to_string());

        let mut data = BytesMut::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| multipart_error(e, max_size))?
        {
            if data.len() + chunk.len() > max_size {
                return Err(validation_error(ValidationError::FileTooLarge {
                    size: data.len() + chunk.len(),
                    max: max_size,
                }));
            }
            data.extend_from_slice(&chunk);
        }

        let candidate = CandidateFile::new(filename, content_type, data.freeze());
        if candidate.is_blank() {
            continue;
        }

        files.push(candidate);
        if files.len() > UploadValidator::MAX_FILES {
            return Err(validation_error(ValidationError::TooManyFiles {
                max: UploadValidator::MAX_FILES,
            }));
        }
    }

    Ok(files)
}

/// Display-safe version of a client filename.
///
/// Path components are dropped and anything outside `[A-Za-z0-9._ -]` (plus
/// other alphanumerics) becomes `_`. Never empty.
pub fn sanitize_filename(filename: Option<&str>) -> String {
    const MAX_FILENAME_LENGTH: usize = 255;

    let raw = filename.unwrap_or("");
    // Browsers on Windows may send full paths
    let filename_only = raw.rsplit(['/', '\\']).next().unwrap_or(raw);

    let sanitized: String = filename_only
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_' | ' ' | '(' | ')') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = sanitized.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        "document.pdf".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Lowercased alphanumeric extension of `filename`, `pdf` when unusable
fn upload_extension(filename: &str) -> String {
    std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| {
            !e.is_empty()
                && e.len() <= MAX_EXTENSION_LEN
                && e.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

/// `<field>-<millis>-<random>.<ext>`
pub fn temp_upload_name(field_name: &str, original_filename: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::rng().random_range(0..1_000_000_000);
    format!(
        "{}-{}-{}.{}",
        field_name,
        millis,
        suffix,
        upload_extension(original_filename)
    )
}
