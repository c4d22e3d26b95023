use logtable_types::{RegistryEntry, TableName};
use rusqlite::{Connection, params};

use crate::Result;

/// Register a session table. Re-registering an existing name is a no-op, so
/// a retried provisioning never produces a second entry.
pub fn insert(conn: &Connection, table: &TableName) -> Result<bool> {
    let inserted = conn.execute(
        r#"
        INSERT INTO log_history (table_name)
        VALUES (?1)
        ON CONFLICT(table_name) DO NOTHING
        "#,
        params![table.as_str()],
    )?;

    Ok(inserted > 0)
}

pub fn list(conn: &Connection) -> Result<Vec<RegistryEntry>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, table_name, created_at, updated_at
        FROM log_history
        ORDER BY id
        "#,
    )?;

    let entries = stmt
        .query_map([], |row| {
            Ok(RegistryEntry {
                id: row.get(0)?,
                table_name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                created_at: row.get(2)?,
                updated_at: row.get(3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(entries)
}

pub fn get(conn: &Connection, table_name: &str) -> Result<Option<RegistryEntry>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, table_name, created_at, updated_at
        FROM log_history
        WHERE table_name = ?1
        "#,
    )?;

    let mut rows = stmt.query([table_name])?;
    if let Some(row) = rows.next()? {
        Ok(Some(RegistryEntry {
            id: row.get(0)?,
            table_name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            created_at: row.get(2)?,
            updated_at: row.get(3)?,
        }))
    } else {
        Ok(None)
    }
}

pub fn remove_by_id(conn: &Connection, id: i64) -> Result<usize> {
    Ok(conn.execute("DELETE FROM log_history WHERE id = ?1", [id])?)
}

pub fn remove_by_name(conn: &Connection, table_name: &str) -> Result<usize> {
    Ok(conn.execute(
        "DELETE FROM log_history WHERE table_name = ?1",
        [table_name],
    )?)
}
