use crate::error::HttpAppError;
use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use docshift_core::AppError;

/// Turn the empty 408 of `tower_http::timeout::TimeoutLayer` into a JSON error.
///
/// Must sit directly outside the timeout layer; no handler answers 408 itself.
pub async fn timeout_error_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let response = next.run(request).await;

    if response.status() != StatusCode::REQUEST_TIMEOUT {
        return response;
    }

    tracing::warn!(method = %method, uri = %uri, "Request timed out");
    HttpAppError(AppError::Timeout("Request timed out".to_string())).into_response()
}
