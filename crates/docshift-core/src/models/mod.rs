//! Domain models for the conversion pipeline

mod conversion;
mod upload;

pub use conversion::{
    ConversionResult, ConvertedDocument, CONVERTED_EXTENSION, CONVERTED_PREFIX,
};
pub use upload::UploadedFile;
