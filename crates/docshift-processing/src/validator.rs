use bytes::Bytes;

/// Reasons an upload is refused before any conversion work starts
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("No file uploaded")]
    MissingFile,

    #[error("Too many files")]
    TooManyFiles { max: usize },

    #[error("File too large. Maximum size is {}MB", .max / (1024 * 1024))]
    FileTooLarge { size: usize, max: usize },

    #[error("Only PDF files are allowed")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },
}

/// A file part as received from the client, before admission
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl CandidateFile {
    pub fn new(filename: Option<String>, content_type: Option<String>, data: Bytes) -> Self {
        Self {
            filename,
            content_type,
            data,
        }
    }

    /// Browsers submit an empty part when the file input was left blank
    pub fn is_blank(&self) -> bool {
        self.filename.as_deref().is_none_or(|name| name.trim().is_empty()) && self.data.is_empty()
    }
}

/// Upload gatekeeper
///
/// Admits exactly one file whose declared MIME type is accepted and whose
/// size does not exceed the ceiling.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    max_file_size: usize,
    allowed_content_types: Vec<String>,
}

/// Strip MIME parameters (`application/pdf; charset=binary`) and lowercase
pub fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

impl UploadValidator {
    pub const MAX_FILES: usize = 1;

    pub fn new(max_file_size: usize, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_content_types: allowed_content_types
                .iter()
                .map(|ct| essence(ct))
                .collect(),
        }
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    pub fn validate_file_count(&self, count: usize) -> Result<(), ValidationError> {
        if count == 0 {
            return Err(ValidationError::MissingFile);
        }

        if count > Self::MAX_FILES {
            return Err(ValidationError::TooManyFiles {
                max: Self::MAX_FILES,
            });
        }

        Ok(())
    }

    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    pub fn validate_content_type(&self, content_type: Option<&str>) -> Result<(), ValidationError> {
        let declared = content_type.unwrap_or("");
        let normalized = essence(declared);

        if !self.allowed_content_types.iter().any(|ct| ct == &normalized) {
            return Err(ValidationError::InvalidContentType {
                content_type: declared.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }

    /// Validate a whole submission and return the single admitted file
    pub fn validate<'a>(
        &self,
        files: &'a [CandidateFile],
    ) -> Result<&'a CandidateFile, ValidationError> {
        let present: Vec<&CandidateFile> = files.iter().filter(|f| !f.is_blank()).collect();
        self.validate_file_count(present.len())?;

        let file = present[0];
        self.validate_content_type(file.content_type.as_deref())?;
        self.validate_file_size(file.data.len())?;

        Ok(file)
    }
}
