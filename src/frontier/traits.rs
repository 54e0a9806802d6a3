//! Frontier store trait

use crate::frontier::{FrontierResult, Membership};
use crate::target::TargetId;
use async_trait::async_trait;

/// Shared, deduplicated work queue
///
/// Implementations must keep the pending and completed sets disjoint and make
/// [`claim_one`](FrontierStore::claim_one) atomic with respect to every other
/// process sharing the store.
#[async_trait]
pub trait FrontierStore: Send + Sync {
    /// Removes and returns one arbitrary pending identifier
    async fn claim_one(&self) -> FrontierResult<Option<TargetId>>;

    /// Returns a claimed identifier to pending after a failed attempt
    async fn release(&self, id: &TargetId) -> FrontierResult<()>;

    /// Records an identifier as permanently done
    ///
    /// Also drops it from pending, so the sets stay disjoint even if the
    /// identifier was rediscovered while claimed.
    async fn mark_completed(&self, id: &TargetId) -> FrontierResult<()>;

    /// Adds to pending unless already pending or completed
    ///
    /// Returns whether the identifier was actually added.
    async fn add_if_new(&self, id: &TargetId) -> FrontierResult<bool>;

    /// Whether pending is currently empty
    async fn is_empty(&self) -> FrontierResult<bool> {
        Ok(self.pending_count().await? == 0)
    }

    async fn is_completed(&self, id: &TargetId) -> FrontierResult<bool> {
        Ok(self.membership(id).await? == Membership::Completed)
    }

    async fn membership(&self, id: &TargetId) -> FrontierResult<Membership>;

    async fn pending_count(&self) -> FrontierResult<u64>;

    async fn completed_count(&self) -> FrontierResult<u64>;
}
