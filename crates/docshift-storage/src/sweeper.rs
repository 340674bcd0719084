use crate::error::StorageResult;
use crate::local::LocalStorage;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::time::interval;

/// Periodically removes stale files that no timer will ever delete, such as
/// documents that were never downloaded or leftovers of a previous run.
pub struct OrphanSweeper {
    storage: LocalStorage,
    max_age: Duration,
    matches: fn(&str) -> bool,
}

impl OrphanSweeper {
    /// Only files whose name satisfies `matches` are considered
    pub fn new(storage: LocalStorage, max_age: Duration, matches: fn(&str) -> bool) -> Self {
        Self {
            storage,
            max_age,
            matches,
        }
    }

    /// Start sweeping every `every`; a zero interval disables the sweeper
    pub fn start(self: Arc<Self>, every: Duration) -> Option<tokio::task::JoinHandle<()>> {
        if every.is_zero() {
            tracing::info!(
                dir = %self.storage.base_path().display(),
                "Orphan sweeper disabled"
            );
            return None;
        }

        Some(tokio::spawn(async move {
            let mut sweep_interval = interval(every);

            loop {
                sweep_interval.tick().await;

                match self.sweep().await {
                    Ok(0) => {}
                    Ok(deleted) => tracing::info!(
                        dir = %self.storage.base_path().display(),
                        deleted,
                        "Orphan sweep completed"
                    ),
                    Err(e) => tracing::error!(
                        error = %e,
                        dir = %self.storage.base_path().display(),
                        "Orphan sweep failed"
                    ),
                }
            }
        }))
    }

    /// One pass over the directory; returns how many files were removed
    pub async fn sweep(&self) -> StorageResult<usize> {
        let mut entries = tokio::fs::read_dir(self.storage.base_path()).await?;
        let now = SystemTime::now();
        let mut deleted = 0;

        while let Some(entry) = entries.next_entry().await? {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if !(self.matches)(&name) {
                continue;
            }

            let metadata = match entry.metadata().await {
                Ok(metadata) if metadata.is_file() => metadata,
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!(error = %e, file = %name, "Failed to stat file during sweep");
                    continue;
                }
            };

            let expired = metadata
                .modified()
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .is_some_and(|age| age >= self.max_age);

            if !expired {
                continue;
            }

            match self.storage.delete(&name).await {
                Ok(()) => deleted += 1,
                Err(e) => tracing::warn!(error = %e, file = %name, "Failed to delete orphaned file"),
            }
        }

        Ok(deleted)
    }
}
