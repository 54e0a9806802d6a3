//! Persistence sinks for validated records
//!
//! The crawl loop hands each [`ValidatedRecord`] to a [`RecordSink`] and
//! treats any sink failure as a reason to retry the target later. The audit
//! file written next to it is a side channel and never fails an attempt.

mod audit;
mod sqlite;

pub use audit::AuditWriter;
pub use sqlite::SqliteRecordSink;

use crate::schema::ValidatedRecord;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sink lock poisoned")]
    Poisoned,
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Consumer of validated records
///
/// The write either succeeds or errors; no partial-write guarantees are
/// assumed by the caller.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn store(&self, record: ValidatedRecord) -> SinkResult<()>;
}
