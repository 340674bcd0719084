//! API-level middleware that needs the application error type or state

pub mod error_details;
pub mod timeout;

pub use error_details::error_details_middleware;
pub use timeout::timeout_error_middleware;
