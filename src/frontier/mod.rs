//! Frontier store: the shared pending/completed work queue
//!
//! The frontier holds every known target identifier in exactly one of two
//! sets. Claiming removes an identifier from pending atomically; the claimer
//! then either marks it completed or releases it back. Completed identifiers
//! are never re-added, which is what keeps rediscovered work from being
//! crawled twice across restarts.

mod memory;
mod schema;
mod sqlite;
mod traits;

pub use memory::InMemoryFrontier;
pub use sqlite::SqliteFrontier;
pub use traits::FrontierStore;

use crate::TargetError;
use thiserror::Error;

/// Errors raised by the backing store
///
/// Any of these is fatal to the crawl loop.
#[derive(Debug, Error)]
pub enum FrontierError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Frontier lock poisoned")]
    Poisoned,

    #[error("Corrupt identifier in frontier: {0}")]
    CorruptId(#[from] TargetError),
}

/// Result type for frontier operations
pub type FrontierResult<T> = Result<T, FrontierError>;

/// Which of the two sets an identifier is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Pending,
    Completed,
    /// Neither pending nor completed; possibly claimed by an attempt in flight
    Unknown,
}
