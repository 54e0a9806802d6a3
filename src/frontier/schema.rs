//! Frontier database schema

/// Two disjoint sets keyed by identifier
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS pending (
    id TEXT PRIMARY KEY
);

CREATE TABLE IF NOT EXISTS completed (
    id TEXT PRIMARY KEY,
    completed_at TEXT NOT NULL
);
"#;

/// Initializes the frontier schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}
