//! Crawl orchestration
//!
//! [`Coordinator`] owns the control loop; [`run_crawl`] wires it to the
//! stores named in a [`Config`].

mod coordinator;

pub use coordinator::{AttemptError, Coordinator, CrawlStats};

use crate::config::Config;
use crate::extract::Extractor;
use crate::fetcher::Fetcher;
use crate::frontier::{FrontierResult, FrontierStore, SqliteFrontier};
use crate::sink::{AuditWriter, SqliteRecordSink};
use crate::target::{Site, TargetId};
use std::path::Path;
use std::sync::Arc;

/// Adds seed identifiers to the frontier, returning how many were new
pub async fn seed_frontier(
    frontier: &dyn FrontierStore,
    seeds: &[TargetId],
) -> FrontierResult<u64> {
    let mut added = 0;
    for seed in seeds {
        if frontier.add_if_new(seed).await? {
            added += 1;
        } else {
            tracing::info!("Seed {} is already known, skipping", seed);
        }
    }
    Ok(added)
}

/// Runs a complete crawl against the configured stores
///
/// Seeds are offered to the frontier first. Returns once the frontier is
/// exhausted or `max_targets` targets were attempted, or with the first
/// frontier error.
pub async fn run_crawl(
    config: Config,
    seeds: &[TargetId],
    max_targets: Option<u64>,
) -> crate::Result<CrawlStats> {
    let site = Site::from_config(&config.site)?;
    let fetcher = Fetcher::new(&config.fetcher)?;

    let frontier: Arc<dyn FrontierStore> =
        Arc::new(SqliteFrontier::open(Path::new(&config.frontier.database_path))?);
    let sink = Arc::new(SqliteRecordSink::open(Path::new(&config.output.records_path))?);

    let seeded = seed_frontier(frontier.as_ref(), seeds).await?;
    if seeded > 0 {
        tracing::info!("Seeded {} targets", seeded);
    }

    let mut coordinator = Coordinator::new(frontier, sink, Extractor::new(fetcher, site))
        .with_audit(AuditWriter::new(&config.output.audit_dir))
        .with_max_targets(max_targets);
    coordinator.run().await
}
