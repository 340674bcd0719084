//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`; domain errors
//! convert into `AppError` first so every failure renders the same
//! `{error, details?, code}` body. The rendered body never carries
//! `details`; `error_details_middleware` adds them when the loaded config
//! says development.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use docshift_core::{AppError, ErrorMetadata, LogLevel};
use docshift_processing::{DocumentWriteError, ValidationError};
use docshift_storage::StorageError;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Error chain; development mode only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
}

/// Wrapper type for AppError to implement IntoResponse
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        HttpAppError(validation_error(err))
    }
}

impl From<DocumentWriteError> for HttpAppError {
    fn from(err: DocumentWriteError) -> Self {
        HttpAppError(document_write_error(err))
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(storage_error(err))
    }
}

/// Every gatekeeper rejection is a 400 carrying the rejection message
pub fn validation_error(err: ValidationError) -> AppError {
    AppError::Validation(err.to_string())
}

pub fn document_write_error(err: DocumentWriteError) -> AppError {
    AppError::DocumentWrite(err.to_string())
}

pub fn storage_error(err: StorageError) -> AppError {
    match err {
        StorageError::NotFound(_) => AppError::NotFound("File not found or expired".to_string()),
        StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
        StorageError::WriteFailed(msg)
        | StorageError::ReadFailed(msg)
        | StorageError::DeleteFailed(msg)
        | StorageError::ConfigError(msg) => AppError::Internal(msg),
        StorageError::IoError(err) => AppError::Internal(format!("IO error: {}", err)),
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

/// Response extension holding the error body with its error chain filled in
#[derive(Debug, Clone)]
pub struct ErrorDetails(pub ErrorResponse);

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = ErrorResponse {
            error: app_error.client_message(),
            details: None,
            code: app_error.error_code().to_string(),
        };
        let detailed = ErrorResponse {
            details: Some(app_error.detailed_message()),
            ..body.clone()
        };

        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(ErrorDetails(detailed));
        response
    }
}
