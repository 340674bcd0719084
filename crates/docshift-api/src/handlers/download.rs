use crate::error::{storage_error, HttpAppError};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, Response, StatusCode},
    response::IntoResponse,
};
use docshift_core::{AppError, ConvertedDocument};
use docshift_processing::DOCX_CONTENT_TYPE;
use futures::StreamExt;
use std::sync::Arc;

#[tracing::instrument(skip(state), fields(operation = "download"))]
pub async fn download_document(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    if !ConvertedDocument::is_valid_filename(&filename) {
        return Err(AppError::InvalidInput("Invalid filename".to_string()).into());
    }

    let (stream, content_length) = state
        .outputs
        .open_stream(&filename)
        .await
        .map_err(storage_error)?;

    // Dropped with the body: after the last chunk is sent or when the client goes away
    let cleanup = state
        .retention
        .output_guard(state.outputs.key_to_path(&filename)?);
    let body_stream = stream.map(move |chunk| {
        let _cleanup = &cleanup;
        chunk
    });

    let download_name = format!(
        "converted-document-{}.docx",
        chrono::Utc::now().timestamp_millis()
    );
    let content_disposition = format!("attachment; filename=\"{}\"", download_name);

    tracing::debug!(
        file = %filename,
        size_bytes = content_length,
        download_name = %download_name,
        "Streaming converted document"
    );

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, DOCX_CONTENT_TYPE)
        .header(header::CONTENT_DISPOSITION, content_disposition.as_str())
        .header(header::CONTENT_LENGTH, content_length)
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from_stream(body_stream))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}
