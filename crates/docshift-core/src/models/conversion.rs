use serde::Serialize;
use std::path::PathBuf;

/// Filename prefix shared by every generated document
pub const CONVERTED_PREFIX: &str = "converted-";
/// Extension of generated documents
pub const CONVERTED_EXTENSION: &str = "docx";

/// A generated `.docx` file sitting in the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedDocument {
    pub path: PathBuf,
    /// Always `converted-<digits>.docx`
    pub filename: String,
    pub size_bytes: u64,
}

impl ConvertedDocument {
    /// `converted-<millis><6 random digits>.docx`
    pub fn filename_for(timestamp_millis: u64, suffix: u32) -> String {
        format!(
            "{}{}{:06}.{}",
            CONVERTED_PREFIX,
            timestamp_millis,
            suffix % 1_000_000,
            CONVERTED_EXTENSION
        )
    }

    /// True for names shaped like `converted-<digits>.docx` and nothing else
    pub fn is_valid_filename(filename: &str) -> bool {
        filename
            .strip_prefix(CONVERTED_PREFIX)
            .and_then(|rest| rest.strip_suffix(".docx"))
            .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
    }

    /// Relative URL served by the download route
    pub fn download_url(&self) -> String {
        format!("/download/{}", self.filename)
    }
}

/// Response payload of a successful conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub success: bool,
    pub download_url: String,
    pub original_name: String,
}

impl ConversionResult {
    pub fn completed(document: &ConvertedDocument, original_name: impl Into<String>) -> Self {
        Self {
            success: true,
            download_url: document.download_url(),
            original_name: original_name.into(),
        }
    }
}
