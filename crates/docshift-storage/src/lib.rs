//! docshift Storage Library
//!
//! Directory-backed storage for uploaded PDFs and generated documents, plus
//! the timers that remove them again.

pub mod error;
pub mod local;
pub mod retention;
pub mod sweeper;

pub use error::{StorageError, StorageResult};
pub use local::{ByteStream, LocalStorage};
pub use retention::{schedule_delete, RetentionManager, ScheduledDelete};
pub use sweeper::OrphanSweeper;
