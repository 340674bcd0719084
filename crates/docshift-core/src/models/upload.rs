use std::path::PathBuf;

/// A PDF admitted by the upload gatekeeper and persisted to the uploads directory.
///
/// Owned by the request that received it; the retention manager deletes the
/// file shortly after that request finishes, whatever the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub temp_path: PathBuf,
    /// Sanitized, display-safe version of the client filename
    pub original_filename: String,
    pub content_type: String,
    pub size_bytes: usize,
}
