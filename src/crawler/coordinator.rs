//! Crawler coordinator - main crawl orchestration logic
//!
//! One control loop per process. Each iteration claims a target from the
//! frontier, fetches its payload pair, mines it for new targets, extracts and
//! validates a record, and either persists it and marks the target completed
//! or releases the target back to pending. Only frontier failures end the
//! loop early.

use crate::discovery::discover_targets;
use crate::extract::{ExtractError, Extractor, RawPayloads};
use crate::frontier::{FrontierResult, FrontierStore};
use crate::schema::{validate_record, ValidatedRecord, ValidationError};
use crate::sink::{AuditWriter, RecordSink, SinkError};
use crate::target::TargetId;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::task::JoinHandle;

/// Why one attempt did not complete its target
///
/// Every variant is retryable: the target goes back to pending.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("record rejected: {0}")]
    Validation(#[from] ValidationError),

    #[error("sink write failed: {0}")]
    Sink(#[from] SinkError),
}

/// Counters for one run of the loop
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Targets claimed and attempted
    pub processed: u64,
    /// Targets persisted and marked completed
    pub completed: u64,
    /// Targets returned to pending
    pub released: u64,
    /// Identifiers found by discovery, before dedup against the frontier
    pub discovered: u64,
    /// Identifiers actually added to pending
    pub added: u64,
}

type AddTask = JoinHandle<FrontierResult<u64>>;

/// Main crawler coordinator structure
pub struct Coordinator {
    frontier: Arc<dyn FrontierStore>,
    sink: Arc<dyn RecordSink>,
    audit: Option<AuditWriter>,
    extractor: Extractor,
    max_targets: Option<u64>,
    stats: CrawlStats,
}

impl Coordinator {
    pub fn new(
        frontier: Arc<dyn FrontierStore>,
        sink: Arc<dyn RecordSink>,
        extractor: Extractor,
    ) -> Self {
        Self {
            frontier,
            sink,
            audit: None,
            extractor,
            max_targets: None,
            stats: CrawlStats::default(),
        }
    }

    /// Writes an audit copy of every validated record into `audit`
    pub fn with_audit(mut self, audit: AuditWriter) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Stops after `max` claimed targets even if pending is not empty
    pub fn with_max_targets(mut self, max: Option<u64>) -> Self {
        self.max_targets = max;
        self
    }

    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    /// Runs the loop until the frontier reads empty
    ///
    /// When pending reads empty after an item, only that item's discovery
    /// write is awaited before checking again. Writes still in flight from
    /// earlier items are not, so they can refill the frontier after the loop
    /// has decided to stop; this is detected and logged at exit.
    pub async fn run(&mut self) -> crate::Result<CrawlStats> {
        tracing::info!("Starting crawl");

        let start_time = Instant::now();
        let mut in_flight: Vec<AddTask> = Vec::new();
        let mut exhausted = false;

        loop {
            if self.max_targets.is_some_and(|max| self.stats.processed >= max) {
                tracing::info!("Reached limit of {} targets", self.stats.processed);
                break;
            }

            let id = match self.frontier.claim_one().await? {
                Some(id) => id,
                None => {
                    tracing::info!("Frontier is empty, crawl complete");
                    exhausted = true;
                    break;
                }
            };

            tracing::debug!("Claimed {}", id);
            let discovered = self.process(&id).await?;
            self.stats.processed += 1;
            self.stats.discovered += discovered.len() as u64;

            in_flight.push(tokio::spawn(add_discovered(
                Arc::clone(&self.frontier),
                discovered,
            )));
            self.reap_finished(&mut in_flight).await?;

            if self.stats.processed % 10 == 0 {
                let rate = self.stats.processed as f64 / start_time.elapsed().as_secs_f64();
                tracing::info!(
                    "Progress: {} processed, {} completed, {} released, {} pending, {:.2} targets/sec",
                    self.stats.processed,
                    self.stats.completed,
                    self.stats.released,
                    self.frontier.pending_count().await?,
                    rate
                );
            }

            if self.frontier.is_empty().await? {
                if let Some(latest) = in_flight.pop() {
                    tracing::debug!("Pending is empty, waiting for latest discovery write");
                    self.stats.added += latest.await??;
                }
            }
        }

        for task in in_flight {
            self.stats.added += task.await??;
        }

        let left = self.frontier.pending_count().await?;
        if exhausted && left > 0 {
            tracing::warn!(
                "{} targets became pending after the exhaustion check; rerun to pick them up",
                left
            );
        }

        tracing::info!(
            "Crawl completed: {} processed, {} completed, {} released in {:?}",
            self.stats.processed,
            self.stats.completed,
            self.stats.released,
            start_time.elapsed()
        );

        Ok(self.stats.clone())
    }

    /// Handles one claimed target and returns the identifiers it discovered
    ///
    /// The target ends up either completed or released. Only frontier errors
    /// are returned.
    async fn process(&mut self, id: &TargetId) -> FrontierResult<Vec<TargetId>> {
        let payloads = match self.extractor.fetch_payloads(id).await {
            Ok(payloads) => payloads,
            Err(e) => {
                self.release(id, &AttemptError::from(e)).await?;
                return Ok(Vec::new());
            }
        };

        let discovered = discover_targets(&payloads.props, self.extractor.site());

        match self.attempt(id, &payloads).await {
            Ok(()) => {
                self.frontier.mark_completed(id).await?;
                self.stats.completed += 1;
                tracing::info!("Completed {} ({} links discovered)", id, discovered.len());
            }
            Err(e) => self.release(id, &e).await?,
        }

        Ok(discovered)
    }

    async fn attempt(&self, id: &TargetId, payloads: &RawPayloads) -> Result<(), AttemptError> {
        let candidate = self.extractor.extract(id, payloads).await?;
        let record = validate_record(id, candidate)?;

        self.write_audit(&record).await;
        self.sink.store(record).await?;

        Ok(())
    }

    async fn write_audit(&self, record: &ValidatedRecord) {
        let Some(audit) = &self.audit else {
            return;
        };

        match audit.write(record).await {
            Ok(path) => tracing::debug!("Wrote {} to {}", record.id(), path.display()),
            Err(e) => tracing::warn!("Failed to write audit file for {}: {}", record.id(), e),
        }
    }

    async fn release(&mut self, id: &TargetId, reason: &AttemptError) -> FrontierResult<()> {
        tracing::warn!("Releasing {}: {}", id, reason);

        self.frontier.release(id).await?;
        self.stats.released += 1;
        Ok(())
    }

    async fn reap_finished(&mut self, in_flight: &mut Vec<AddTask>) -> crate::Result<()> {
        let (finished, running): (Vec<_>, Vec<_>) =
            in_flight.drain(..).partition(|task| task.is_finished());
        *in_flight = running;

        for task in finished {
            self.stats.added += task.await??;
        }
        Ok(())
    }
}

/// Offers discovered identifiers to the frontier, skipping completed ones
async fn add_discovered(
    frontier: Arc<dyn FrontierStore>,
    ids: Vec<TargetId>,
) -> FrontierResult<u64> {
    let mut added = 0;
    for id in ids {
        if frontier.is_completed(&id).await? {
            continue;
        }
        if frontier.add_if_new(&id).await? {
            tracing::debug!("Queued {}", id);
            added += 1;
        }
    }
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontier::InMemoryFrontier;

    fn id(s: &str) -> TargetId {
        TargetId::new(s).unwrap()
    }

    #[tokio::test]
    async fn test_add_discovered_skips_known() {
        let frontier = Arc::new(InMemoryFrontier::with_pending([id("p")]));
        frontier.mark_completed(&id("c")).await.unwrap();

        let added = add_discovered(
            frontier.clone(),
            vec![id("c"), id("p"), id("n"), id("n")],
        )
        .await
        .unwrap();

        assert_eq!(added, 1);
        assert_eq!(frontier.pending_ids().unwrap(), vec![id("n"), id("p")]);
        assert_eq!(frontier.completed_ids().unwrap(), vec![id("c")]);
    }
}
