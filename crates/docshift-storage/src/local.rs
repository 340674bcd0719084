use crate::error::{StorageError, StorageResult};
use bytes::Bytes;
use futures::Stream;
use std::path::{Component, Path, PathBuf};
use std::pin::Pin;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;

/// Chunked file body
pub type ByteStream = Pin<Box<dyn Stream<Item = std::io::Result<Bytes>> + Send>>;

/// A flat directory of files addressed by bare file names
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Open the directory, creating it if absent
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        tracing::debug!(path = %base_path.display(), "Storage directory ready");

        Ok(LocalStorage { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a key to a path directly inside the base directory.
    ///
    /// Keys are single file names: separators, `..` and absolute paths are
    /// rejected.
    pub fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        if key.is_empty() || key.contains("..") || key.contains('/') || key.contains('\\') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        let mut components = Path::new(key).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.base_path.join(key)),
            _ => Err(StorageError::InvalidKey(
                "Storage key resolves outside storage directory".to_string(),
            )),
        }
    }

    /// Write `data` under `key`; fails if the file already exists
    pub async fn write_new(&self, key: &str, data: &[u8]) -> StorageResult<PathBuf> {
        let path = self.key_to_path(key)?;
        let start = std::time::Instant::now();

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| {
                StorageError::WriteFailed(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                ))
            })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::debug!(
            path = %path.display(),
            key = %key,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        Ok(path)
    }

    /// Open `key` for streaming; returns the stream and the file length
    pub async fn open_stream(&self, key: &str) -> StorageResult<(ByteStream, u64)> {
        let path = self.key_to_path(key)?;

        let file = match fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(key.to_string()));
            }
            Err(e) => {
                return Err(StorageError::ReadFailed(format!(
                    "Failed to open file {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let len = file
            .metadata()
            .await
            .map_err(|e| StorageError::ReadFailed(e.to_string()))?
            .len();

        Ok((Box::pin(ReaderStream::new(file)), len))
    }

    /// Remove `key`; a missing file is not an error
    pub async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.key_to_path(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), key = %key, "Local storage delete successful");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to delete file {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_new_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("uploads");
        let storage = LocalStorage::new(&nested).await.unwrap();
        assert!(nested.is_dir());
        assert_eq!(storage.base_path(), nested.as_path());
    }

    #[tokio::test]
    async fn test_key_to_path_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        for key in ["", "..", "../etc/passwd", "a/b", "/etc/passwd", "a\\b", ".", "x..y"] {
            assert!(
                matches!(storage.key_to_path(key), Err(StorageError::InvalidKey(_))),
                "accepted {:?}",
                key
            );
        }
        assert_eq!(
            storage.key_to_path("converted-1.docx").unwrap(),
            dir.path().join("converted-1.docx")
        );
    }

    #[tokio::test]
    async fn test_write_stream_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let path = storage.write_new("a.pdf", b"%PDF-1.5 body").await.unwrap();
        assert!(path.exists());

        let (mut stream, len) = storage.open_stream("a.pdf").await.unwrap();
        assert_eq!(len, 13);
        let mut body = Vec::new();
        while let Some(chunk) = stream.next().await {
            body.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(body, b"%PDF-1.5 body");

        storage.delete("a.pdf").await.unwrap();
        assert!(!path.exists());
        // second delete is a no-op
        storage.delete("a.pdf").await.unwrap();
    }

    #[tokio::test]
    async fn test_write_new_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        storage.write_new("a.pdf", b"first").await.unwrap();
        let err = storage.write_new("a.pdf", b"second").await.unwrap_err();
        assert!(matches!(err, StorageError::WriteFailed(_)));
        assert_eq!(std::fs::read(dir.path().join("a.pdf")).unwrap(), b"first");
    }

    #[tokio::test]
    async fn test_open_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();
        assert!(matches!(
            storage.open_stream("converted-1.docx").await,
            Err(StorageError::NotFound(_))
        ));
    }
}
