//! docshift Processing Library
//!
//! The pure and CPU-bound stages of the conversion pipeline:
//! - `validator`: upload gatekeeping (presence, file count, MIME type, size)
//! - `extract`: PDF text extraction with soft-failure fallback
//! - `text`: text normalization
//! - `document`: `.docx` synthesis and streamed write

pub mod document;
pub mod extract;
pub mod text;
pub mod validator;

pub use document::{DocumentBuilder, DocumentWriteError, DOCX_CONTENT_TYPE};
pub use extract::{ExtractedText, PdfTextExtractor, TextExtractor};
pub use text::{normalize_text, EMPTY_DOCUMENT_PLACEHOLDER};
pub use validator::{CandidateFile, UploadValidator, ValidationError};
