//! docshift API Library
//!
//! This crate provides the HTTP handlers, the conversion orchestrator and
//! application setup.

mod handlers;
mod middleware;
mod services;
mod utils;

pub mod error;
pub mod setup;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::conversion::{ConversionService, ConversionStage};
pub use state::{AppState, Readiness};
