//! SQLite record sink

use crate::extract::CandidateRecord;
use crate::schema::ValidatedRecord;
use crate::sink::{RecordSink, SinkError, SinkResult};
use crate::target::TargetId;
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS merchants (
    target_id TEXT PRIMARY KEY,
    merchant_id TEXT,
    name TEXT,
    entity_type TEXT,
    record_json TEXT NOT NULL,
    stored_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_merchants_merchant_id ON merchants(merchant_id);
"#;

/// Stores one row per target, replacing earlier rows for the same target
pub struct SqliteRecordSink {
    conn: Mutex<Connection>,
}

impl SqliteRecordSink {
    pub fn open(path: &Path) -> SinkResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA busy_timeout = 5000;
        ",
        )?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> SinkResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> SinkResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| SinkError::Poisoned)
    }

    /// Number of stored records
    pub fn count(&self) -> SinkResult<u64> {
        let count: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM merchants", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Loads the stored record for a target
    pub fn get(&self, id: &TargetId) -> SinkResult<Option<CandidateRecord>> {
        let json: Option<String> = self
            .conn()?
            .query_row(
                "SELECT record_json FROM merchants WHERE target_id = ?1",
                params![id.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        Ok(json.map(|j| serde_json::from_str(&j)).transpose()?)
    }
}

#[async_trait]
impl RecordSink for SqliteRecordSink {
    async fn store(&self, record: ValidatedRecord) -> SinkResult<()> {
        let json = serde_json::to_string(record.record())?;
        let candidate = record.record();

        self.conn()?.execute(
            "INSERT INTO merchants (target_id, merchant_id, name, entity_type, record_json, stored_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(target_id) DO UPDATE SET
                merchant_id = excluded.merchant_id,
                name = excluded.name,
                entity_type = excluded.entity_type,
                record_json = excluded.record_json,
                stored_at = excluded.stored_at",
            params![
                record.id().as_str(),
                candidate.merchant_id,
                candidate.name,
                candidate.entity_type,
                json,
                Utc::now().to_rfc3339(),
            ],
        )?;

        Ok(())
    }
}
