//! SQLite frontier
//!
//! Several crawler processes may open the same database file. Claiming is a
//! single `DELETE ... RETURNING` statement, so two processes can never pop
//! the same row.

use crate::frontier::schema::initialize_schema;
use crate::frontier::{FrontierError, FrontierResult, FrontierStore, Membership};
use crate::target::TargetId;
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Frontier backed by a shared SQLite file
pub struct SqliteFrontier {
    conn: Mutex<Connection>,
}

impl SqliteFrontier {
    /// Opens or creates the frontier database at `path`
    pub fn open(path: &Path) -> FrontierResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA busy_timeout = 5000;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database (for testing)
    pub fn open_in_memory() -> FrontierResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> FrontierResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| FrontierError::Poisoned)
    }

    fn count(&self, table: &str) -> FrontierResult<u64> {
        let conn = self.conn()?;
        let count: i64 =
            conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

#[async_trait]
impl FrontierStore for SqliteFrontier {
    async fn claim_one(&self) -> FrontierResult<Option<TargetId>> {
        let conn = self.conn()?;
        let claimed: Option<String> = conn
            .query_row(
                "DELETE FROM pending
                 WHERE id = (SELECT id FROM pending ORDER BY RANDOM() LIMIT 1)
                 RETURNING id",
                [],
                |row| row.get(0),
            )
            .optional()?;

        Ok(claimed.map(TargetId::new).transpose()?)
    }

    async fn release(&self, id: &TargetId) -> FrontierResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO pending (id)
             SELECT ?1 WHERE NOT EXISTS (SELECT 1 FROM completed WHERE id = ?1)",
            params![id.as_str()],
        )?;
        Ok(())
    }

    async fn mark_completed(&self, id: &TargetId) -> FrontierResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT OR IGNORE INTO completed (id, completed_at) VALUES (?1, ?2)",
            params![id.as_str(), Utc::now().to_rfc3339()],
        )?;
        tx.execute("DELETE FROM pending WHERE id = ?1", params![id.as_str()])?;
        tx.commit()?;
        Ok(())
    }

    async fn add_if_new(&self, id: &TargetId) -> FrontierResult<bool> {
        let conn = self.conn()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO pending (id)
             SELECT ?1 WHERE NOT EXISTS (SELECT 1 FROM completed WHERE id = ?1)",
            params![id.as_str()],
        )?;
        Ok(inserted > 0)
    }

    async fn membership(&self, id: &TargetId) -> FrontierResult<Membership> {
        let conn = self.conn()?;
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM completed WHERE id = ?1
                 UNION ALL
                 SELECT 0 FROM pending WHERE id = ?1
                 LIMIT 1",
                params![id.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        Ok(match found {
            Some(1) => Membership::Completed,
            Some(_) => Membership::Pending,
            None => Membership::Unknown,
        })
    }

    async fn pending_count(&self) -> FrontierResult<u64> {
        self.count("pending")
    }

    async fn completed_count(&self) -> FrontierResult<u64> {
        self.count("completed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn id(s: &str) -> TargetId {
        TargetId::new(s).unwrap()
    }

    #[tokio::test]
    async fn test_claim_removes_from_pending() {
        let frontier = SqliteFrontier::open_in_memory().unwrap();
        assert!(frontier.add_if_new(&id("x")).await.unwrap());

        assert_eq!(frontier.claim_one().await.unwrap(), Some(id("x")));
        assert_eq!(frontier.membership(&id("x")).await.unwrap(), Membership::Unknown);
        assert!(frontier.is_empty().await.unwrap());
        assert_eq!(frontier.claim_one().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_release_returns_to_pending() {
        let frontier = SqliteFrontier::open_in_memory().unwrap();
        frontier.add_if_new(&id("x")).await.unwrap();
        let claimed = frontier.claim_one().await.unwrap().unwrap();

        frontier.release(&claimed).await.unwrap();
        assert_eq!(frontier.membership(&id("x")).await.unwrap(), Membership::Pending);
        assert_eq!(frontier.completed_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_add_if_new_skips_known_ids() {
        let frontier = SqliteFrontier::open_in_memory().unwrap();
        assert!(frontier.add_if_new(&id("x")).await.unwrap());
        assert!(!frontier.add_if_new(&id("x")).await.unwrap());
        assert_eq!(frontier.pending_count().await.unwrap(), 1);

        let claimed = frontier.claim_one().await.unwrap().unwrap();
        frontier.mark_completed(&claimed).await.unwrap();

        assert!(!frontier.add_if_new(&id("x")).await.unwrap());
        assert_eq!(frontier.pending_count().await.unwrap(), 0);
        assert!(frontier.is_completed(&id("x")).await.unwrap());
    }

    #[tokio::test]
    async fn test_mark_completed_clears_rediscovered_pending() {
        let frontier = SqliteFrontier::open_in_memory().unwrap();
        frontier.add_if_new(&id("x")).await.unwrap();
        frontier.claim_one().await.unwrap();
        // Rediscovered while claimed
        frontier.add_if_new(&id("x")).await.unwrap();

        frontier.mark_completed(&id("x")).await.unwrap();
        assert_eq!(frontier.membership(&id("x")).await.unwrap(), Membership::Completed);
        assert_eq!(frontier.pending_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_release_does_not_resurrect_completed() {
        let frontier = SqliteFrontier::open_in_memory().unwrap();
        frontier.mark_completed(&id("x")).await.unwrap();
        frontier.release(&id("x")).await.unwrap();
        assert_eq!(frontier.pending_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_file_frontier_shared_between_handles() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("frontier.db");

        let first = SqliteFrontier::open(&path).unwrap();
        let second = SqliteFrontier::open(&path).unwrap();
        first.add_if_new(&id("x")).await.unwrap();
        first.add_if_new(&id("y")).await.unwrap();

        let a = first.claim_one().await.unwrap().unwrap();
        let b = second.claim_one().await.unwrap().unwrap();
        assert_ne!(a, b);
        assert_eq!(second.claim_one().await.unwrap(), None);

        second.mark_completed(&b).await.unwrap();
        assert!(first.is_completed(&b).await.unwrap());
    }
}
