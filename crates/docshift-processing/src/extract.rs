//! PDF text extraction
//!
//! Extraction never fails from the caller's point of view: a library error or
//! a panic inside the parser is logged and replaced by a placeholder that
//! names the failure, so the user still receives a document.

use async_trait::async_trait;
use bytes::Bytes;

/// Outcome of a text extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedText {
    /// Text pulled out of the file; may be empty
    Text(String),
    /// Extraction failed and `placeholder` stands in for the content
    Fallback { placeholder: String, reason: String },
}

impl ExtractedText {
    pub fn fallback(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        ExtractedText::Fallback {
            placeholder: format!("Error extracting text from PDF: {}", reason),
            reason,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ExtractedText::Text(text) => text,
            ExtractedText::Fallback { placeholder, .. } => placeholder,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ExtractedText::Fallback { .. })
    }
}

/// Source of raw text for the conversion pipeline
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, data: Bytes) -> ExtractedText;
}

/// `pdf-extract` backed extractor running on the blocking pool
#[derive(Debug, Clone, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_blocking(data: &[u8]) -> ExtractedText {
        match pdf_extract::extract_text_from_mem(data) {
            Ok(text) => {
                tracing::debug!(text_len = text.len(), "PDF text extracted");
                ExtractedText::Text(text)
            }
            Err(e) => {
                tracing::warn!(error = %e, "PDF text extraction failed");
                ExtractedText::fallback(e.to_string())
            }
        }
    }
}

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, data: Bytes) -> ExtractedText {
        let size = data.len();
        match tokio::task::spawn_blocking(move || Self::extract_blocking(&data)).await {
            Ok(extracted) => extracted,
            Err(e) => {
                // The parser panicked or the task was cancelled
                tracing::warn!(error = %e, size_bytes = size, "PDF text extraction task failed");
                let reason = if e.is_panic() {
                    "the PDF parser crashed on this file".to_string()
                } else {
                    e.to_string()
                };
                ExtractedText::fallback(reason)
            }
        }
    }
}
