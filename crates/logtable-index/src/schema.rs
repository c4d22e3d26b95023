use logtable_types::TableName;
use rusqlite::Connection;

use crate::{Error, Result};

// Schema version of the fixed tables (increment when changing definitions)
pub const SCHEMA_VERSION: i32 = 1;

// NOTE: Storage layout
//
// - log_history is the registry: one row per session table, written before
//   the table itself is created. It is the only place session tables are
//   enumerated from; sqlite_master is consulted for point lookups only.
// - Each session gets its own table. Names are validated TableName values,
//   so they can be spliced into DDL safely (bind parameters cannot name
//   tables).
// - Every managed table carries created_at / updated_at / is_delete audit
//   columns.
//
// Unlike the session tables, the registry is never dropped on a version
// mismatch: dropping it would orphan every session table.

pub fn init_schema(conn: &Connection) -> Result<()> {
    let current_version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if current_version > SCHEMA_VERSION {
        return Err(Error::Query(format!(
            "database schema v{} is newer than this build (v{})",
            current_version, SCHEMA_VERSION
        )));
    }

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            table_name TEXT,
            created_at TEXT DEFAULT (datetime('now', 'localtime')),
            updated_at TEXT DEFAULT (datetime('now', 'localtime')),
            is_delete BOOLEAN DEFAULT false
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_log_history_table ON log_history(table_name);
        "#,
    )?;

    conn.execute(&format!("PRAGMA user_version = {}", SCHEMA_VERSION), [])?;

    Ok(())
}

pub fn session_table_ddl(table: &TableName) -> String {
    format!(
        r#"
        CREATE TABLE IF NOT EXISTS "{t}" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at TEXT DEFAULT (datetime('now', 'localtime')),
            updated_at TEXT DEFAULT (datetime('now', 'localtime')),
            is_delete BOOLEAN DEFAULT false
        );

        CREATE INDEX IF NOT EXISTS "idx_{t}_timestamp" ON "{t}"(timestamp);
        "#,
        t = table.as_str()
    )
}
