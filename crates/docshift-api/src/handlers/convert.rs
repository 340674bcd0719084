use crate::error::{validation_error, HttpAppError};
use crate::services::conversion::ConversionService;
use crate::state::AppState;
use crate::utils::upload::{read_upload_parts, UPLOAD_FIELD};
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use docshift_core::{AppError, ConversionResult};
use docshift_processing::ValidationError;
use std::sync::Arc;

#[tracing::instrument(skip(state, multipart), fields(operation = "convert"))]
pub async fn convert_pdf(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ConversionResult>, HttpAppError> {
    if !state.readiness.is_ready() {
        return Err(AppError::ServiceUnavailable("Server is shutting down".to_string()).into());
    }

    // Not a multipart body at all: treat like a form without a file
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!(rejection = %rejection.body_text(), "Request is not multipart");
        validation_error(ValidationError::MissingFile)
    })?;

    let files =
        read_upload_parts(multipart, UPLOAD_FIELD, state.validator.max_file_size()).await?;

    let result = ConversionService::new(&state).convert(files).await?;

    Ok(Json(result))
}
