//! Statistics read from the frontier and record stores

use crate::frontier::FrontierStore;
use crate::sink::SqliteRecordSink;
use crate::CanaryError;

/// Store-level statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStatistics {
    /// Identifiers waiting to be claimed
    pub pending: u64,

    /// Identifiers permanently done
    pub completed: u64,

    /// Rows in the record sink
    pub records: u64,
}

impl StoreStatistics {
    /// Share of known identifiers that are completed, in percent
    pub fn completion_rate(&self) -> f64 {
        let known = self.pending + self.completed;
        if known == 0 {
            0.0
        } else {
            (self.completed as f64 / known as f64) * 100.0
        }
    }
}

/// Loads statistics from the stores
pub async fn load_statistics(
    frontier: &dyn FrontierStore,
    sink: &SqliteRecordSink,
) -> Result<StoreStatistics, CanaryError> {
    Ok(StoreStatistics {
        pending: frontier.pending_count().await?,
        completed: frontier.completed_count().await?,
        records: sink.count()?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Frontier Statistics ===\n");

    println!("Frontier:");
    println!("  Pending: {}", stats.pending);
    println!("  Completed: {}", stats.completed);
    println!();

    println!("Records:");
    println!("  Stored: {}", stats.records);
    println!();

    println!(
        "Completion: {:.1}% ({} / {} known targets)",
        stats.completion_rate(),
        stats.completed,
        stats.pending + stats.completed
    );
}
