//! In-memory frontier for tests and single-process runs

use crate::frontier::{FrontierError, FrontierResult, FrontierStore, Membership};
use crate::target::TargetId;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Sets {
    pending: BTreeSet<TargetId>,
    completed: BTreeSet<TargetId>,
}

/// Frontier held in process memory
///
/// Claims pop the smallest pending identifier, which keeps test runs
/// deterministic.
#[derive(Debug, Default)]
pub struct InMemoryFrontier {
    sets: Mutex<Sets>,
}

impl InMemoryFrontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier with the given identifiers pending
    pub fn with_pending(ids: impl IntoIterator<Item = TargetId>) -> Self {
        Self {
            sets: Mutex::new(Sets {
                pending: ids.into_iter().collect(),
                completed: BTreeSet::new(),
            }),
        }
    }

    /// Sorted snapshot of pending identifiers
    pub fn pending_ids(&self) -> FrontierResult<Vec<TargetId>> {
        Ok(self.sets()?.pending.iter().cloned().collect())
    }

    /// Sorted snapshot of completed identifiers
    pub fn completed_ids(&self) -> FrontierResult<Vec<TargetId>> {
        Ok(self.sets()?.completed.iter().cloned().collect())
    }

    fn sets(&self) -> FrontierResult<MutexGuard<'_, Sets>> {
        self.sets.lock().map_err(|_| FrontierError::Poisoned)
    }
}

#[async_trait]
impl FrontierStore for InMemoryFrontier {
    async fn claim_one(&self) -> FrontierResult<Option<TargetId>> {
        Ok(self.sets()?.pending.pop_first())
    }

    async fn release(&self, id: &TargetId) -> FrontierResult<()> {
        let mut sets = self.sets()?;
        if !sets.completed.contains(id) {
            sets.pending.insert(id.clone());
        }
        Ok(())
    }

    async fn mark_completed(&self, id: &TargetId) -> FrontierResult<()> {
        let mut sets = self.sets()?;
        sets.pending.remove(id);
        sets.completed.insert(id.clone());
        Ok(())
    }

    async fn add_if_new(&self, id: &TargetId) -> FrontierResult<bool> {
        let mut sets = self.sets()?;
        if sets.completed.contains(id) {
            return Ok(false);
        }
        Ok(sets.pending.insert(id.clone()))
    }

    async fn membership(&self, id: &TargetId) -> FrontierResult<Membership> {
        let sets = self.sets()?;
        Ok(if sets.completed.contains(id) {
            Membership::Completed
        } else if sets.pending.contains(id) {
            Membership::Pending
        } else {
            Membership::Unknown
        })
    }

    async fn pending_count(&self) -> FrontierResult<u64> {
        Ok(self.sets()?.pending.len() as u64)
    }

    async fn completed_count(&self) -> FrontierResult<u64> {
        Ok(self.sets()?.completed.len() as u64)
    }
}
