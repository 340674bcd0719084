//! Delayed file removal
//!
//! Every timer is fire-and-forget: it is never awaited by a request and
//! shutdown does not wait for it. Failures are logged, never returned.

use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Delete `path` after `delay` on a background task
pub fn schedule_delete(path: PathBuf, delay: Duration) -> JoinHandle<()> {
    tokio::spawn(delete_after(path, delay))
}

async fn delete_after(path: PathBuf, delay: Duration) {
    tokio::time::sleep(delay).await;

    match tokio::fs::remove_file(&path).await {
        Ok(()) => tracing::debug!(path = %path.display(), "Deleted expired file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Expired file already gone");
        }
        Err(e) => tracing::error!(error = %e, path = %path.display(), "Failed to delete expired file"),
    }
}

fn delete_now(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "Deleted file without runtime"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::error!(error = %e, path = %path.display(), "Failed to delete file"),
    }
}

/// Retention policy for uploads and generated documents
#[derive(Debug, Clone, Copy)]
pub struct RetentionManager {
    upload_retention: Duration,
    output_retention: Duration,
}

impl RetentionManager {
    pub fn new(upload_retention: Duration, output_retention: Duration) -> Self {
        Self {
            upload_retention,
            output_retention,
        }
    }

    pub fn upload_retention(&self) -> Duration {
        self.upload_retention
    }

    pub fn output_retention(&self) -> Duration {
        self.output_retention
    }

    /// Guard that schedules removal of a temporary upload when dropped
    pub fn upload_guard(&self, path: PathBuf) -> ScheduledDelete {
        ScheduledDelete::new(path, self.upload_retention)
    }

    /// Guard that schedules removal of a generated document when dropped
    pub fn output_guard(&self, path: PathBuf) -> ScheduledDelete {
        ScheduledDelete::new(path, self.output_retention)
    }
}

/// Schedules deletion of a file when dropped.
///
/// Runs on every exit path of its owner, early returns and unwinding
/// included. Outside a tokio runtime the file is removed synchronously.
#[derive(Debug)]
pub struct ScheduledDelete {
    path: Option<PathBuf>,
    delay: Duration,
}

impl ScheduledDelete {
    pub fn new(path: PathBuf, delay: Duration) -> Self {
        Self {
            path: Some(path),
            delay,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Drop for ScheduledDelete {
    fn drop(&mut self) {
        let Some(path) = self.path.take() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(_) => {
                tracing::debug!(
                    path = %path.display(),
                    delay_ms = self.delay.as_millis() as u64,
                    "Scheduled file deletion"
                );
                schedule_delete(path, self.delay);
            }
            Err(_) => delete_now(&path),
        }
    }
}
