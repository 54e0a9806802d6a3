//! Reporting for `--stats`

pub mod stats;

pub use stats::{load_statistics, print_statistics, StoreStatistics};
