//! Word document synthesis

use std::io::Cursor;
use std::path::{Path, PathBuf};

use docx_rs::{AlignmentType, BreakType, Docx, Paragraph, Run};
use tokio::io::AsyncWriteExt;

pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const TITLE: &str = "Converted PDF Document";
// Half-points
const TITLE_SIZE: usize = 32;
const SUBTITLE_SIZE: usize = 20;

#[derive(Debug, thiserror::Error)]
pub enum DocumentWriteError {
    #[error("Failed to pack document: {0}")]
    Pack(String),

    #[error("Failed to create output file {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Builds the `.docx` rendition of extracted text
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder;

impl DocumentBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Title, subtitle naming the source, spacer, then one paragraph per block
    pub fn build(&self, text: &str, original_filename: &str) -> Docx {
        let title = Paragraph::new()
            .add_run(Run::new().add_text(TITLE).bold().size(TITLE_SIZE))
            .align(AlignmentType::Center);

        let subtitle = Paragraph::new().add_run(
            Run::new()
                .add_text(format!(
                    "Original file: {}",
                    strip_control_chars(original_filename)
                ))
                .italic()
                .size(SUBTITLE_SIZE),
        );

        let mut docx = Docx::new()
            .add_paragraph(title)
            .add_paragraph(subtitle)
            .add_paragraph(Paragraph::new());

        for block in split_blocks(text) {
            let mut run = Run::new();
            for (i, line) in block.iter().enumerate() {
                if i > 0 {
                    run = run.add_break(BreakType::TextWrapping);
                }
                run = run.add_text(strip_control_chars(line));
            }
            docx = docx.add_paragraph(Paragraph::new().add_run(run));
        }

        docx
    }

    /// Pack the document into `.docx` bytes
    pub fn render(&self, text: &str, original_filename: &str) -> Result<Vec<u8>, DocumentWriteError> {
        let mut buffer = Cursor::new(Vec::new());
        self.build(text, original_filename)
            .build()
            .pack(&mut buffer)
            .map_err(|e| DocumentWriteError::Pack(e.to_string()))?;
        Ok(buffer.into_inner())
    }

    /// Render and write to `path`, which must not exist yet.
    ///
    /// Returns the number of bytes written.
    pub async fn write_to(
        &self,
        text: &str,
        original_filename: &str,
        path: &Path,
    ) -> Result<u64, DocumentWriteError> {
        let bytes = self.render(text, original_filename)?;
        self.persist(&bytes, path).await
    }

    /// Write already rendered bytes with create-new semantics, then sync.
    ///
    /// A partially written file is removed before the error is returned.
    pub async fn persist(&self, bytes: &[u8], path: &Path) -> Result<u64, DocumentWriteError> {
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
            .map_err(|source| DocumentWriteError::Create {
                path: path.to_path_buf(),
                source,
            })?;

        let written = async {
            file.write_all(bytes).await?;
            file.sync_all().await
        }
        .await;

        if let Err(source) = written {
            drop(file);
            if let Err(e) = tokio::fs::remove_file(path).await {
                tracing::warn!(error = %e, path = %path.display(), "Failed to remove partial document");
            }
            return Err(DocumentWriteError::Write {
                path: path.to_path_buf(),
                source,
            });
        }

        tracing::debug!(
            path = %path.display(),
            size_bytes = bytes.len(),
            "Document written"
        );

        Ok(bytes.len() as u64)
    }
}

/// Split normalized text on blank lines; each block keeps its inner lines
fn split_blocks(text: &str) -> Vec<Vec<&str>> {
    text.split("\n\n")
        .map(|block| block.lines().filter(|line| !line.is_empty()).collect::<Vec<_>>())
        .filter(|lines| !lines.is_empty())
        .collect()
}

/// XML 1.0 cannot carry most C0 controls
fn strip_control_chars(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_control() || *c == '\t')
        .collect()
}
