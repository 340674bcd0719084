//! docshift Core Library
//!
//! This crate provides the domain models, error types and configuration
//! shared by every docshift component.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{BaseConfig, Config, ConverterConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{ConversionResult, ConvertedDocument, UploadedFile};
