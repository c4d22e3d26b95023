use logtable_types::{LogRecord, LogRow, QueryFilter, SortOrder, TableName};
use rusqlite::{Connection, OptionalExtension, ToSql, params_from_iter};
use serde::Serialize;
use std::ops::Range;

use crate::Result;
use crate::schema::session_table_ddl;

/// Point lookup of one table in the physical schema.
pub fn exists(conn: &Connection, table: &TableName) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table.as_str()],
            |_| Ok(()),
        )
        .optional()?;

    Ok(found.is_some())
}

/// Create the session table. Returns `false` when it already existed.
pub fn create(conn: &Connection, table: &TableName) -> Result<bool> {
    if exists(conn, table)? {
        return Ok(false);
    }
    conn.execute_batch(&session_table_ddl(table))?;
    Ok(true)
}

/// Drop the session table. Returns `false` when there was nothing to drop.
pub fn drop_table(conn: &Connection, table: &TableName) -> Result<bool> {
    if !exists(conn, table)? {
        return Ok(false);
    }
    conn.execute_batch(&format!(r#"DROP TABLE IF EXISTS "{}""#, table.as_str()))?;
    Ok(true)
}

pub fn count(conn: &Connection, table: &TableName) -> Result<u64> {
    let n: i64 = conn.query_row(
        &format!(
            r#"SELECT COUNT(*) FROM "{}" WHERE is_delete = 0"#,
            table.as_str()
        ),
        [],
        |row| row.get(0),
    )?;
    Ok(n as u64)
}

/// How much of a chunk rolls back when one of its batches fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Atomicity {
    /// Each batch commits on its own; a failed batch loses only its rows.
    #[default]
    PerBatch,
    /// All batches of a chunk commit together or not at all.
    PerChunk,
}

/// Outcome of loading one chunk of records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub inserted: u64,
    pub failed: u64,
    /// One message per failed batch.
    pub errors: Vec<String>,
    /// Index ranges into the loaded slice whose rows were committed.
    #[serde(skip)]
    pub committed: Vec<Range<usize>>,
}

impl LoadReport {
    /// Accumulate counts and errors. Ranges are per call and are not merged.
    pub fn merge(&mut self, other: &LoadReport) {
        self.inserted += other.inserted;
        self.failed += other.failed;
        self.errors.extend(other.errors.iter().cloned());
    }

    /// The records of `records` (the slice this report was produced for)
    /// that actually reached the table.
    pub fn committed_records(&self, records: &[LogRecord]) -> Vec<LogRecord> {
        self.committed
            .iter()
            .filter_map(|range| records.get(range.clone()))
            .flatten()
            .cloned()
            .collect()
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Insert `records` in order, `batch_size` rows per statement.
///
/// Statement failures (constraint violations and the like) are recorded in
/// the report instead of being returned; only failures to begin or commit a
/// transaction are errors.
pub fn insert_records(
    conn: &mut Connection,
    table: &TableName,
    records: &[LogRecord],
    batch_size: usize,
    atomicity: Atomicity,
) -> Result<LoadReport> {
    let batch_size = batch_size.max(1);
    let mut report = LoadReport::default();

    match atomicity {
        Atomicity::PerBatch => {
            for (index, batch) in records.chunks(batch_size).enumerate() {
                match insert_batch(conn, table, batch) {
                    Ok(n) => {
                        let start = index * batch_size;
                        report.inserted += n as u64;
                        report.committed.push(start..start + batch.len());
                    }
                    Err(err) => {
                        report.failed += batch.len() as u64;
                        report.errors.push(format!("batch {}: {}", index, err));
                    }
                }
            }
        }
        Atomicity::PerChunk => {
            let tx = conn.transaction()?;
            for (index, batch) in records.chunks(batch_size).enumerate() {
                if let Err(err) = insert_batch(&tx, table, batch) {
                    // Dropping the transaction rolls back every batch of this chunk
                    drop(tx);
                    report.failed = records.len() as u64;
                    report
                        .errors
                        .push(format!("batch {} (chunk rolled back): {}", index, err));
                    return Ok(report);
                }
            }
            tx.commit()?;
            report.inserted = records.len() as u64;
            if !records.is_empty() {
                report.committed.push(0..records.len());
            }
        }
    }

    Ok(report)
}

fn insert_batch(
    conn: &Connection,
    table: &TableName,
    batch: &[LogRecord],
) -> rusqlite::Result<usize> {
    if batch.is_empty() {
        return Ok(0);
    }

    let placeholders = vec!["(?, ?)"; batch.len()].join(", ");
    let sql = format!(
        r#"INSERT INTO "{}" (timestamp, content) VALUES {}"#,
        table.as_str(),
        placeholders
    );

    let mut stmt = conn.prepare_cached(&sql)?;
    stmt.execute(params_from_iter(
        batch
            .iter()
            .flat_map(|r| [r.timestamp.as_str(), r.content.as_str()]),
    ))
}

/// Run a filtered query. All present filters are ANDed.
///
/// `search_text` uses `instr`, which is case sensitive (unlike `LIKE`) and
/// treats `%` and `_` literally.
pub fn query(conn: &Connection, table: &TableName, filter: &QueryFilter) -> Result<Vec<LogRow>> {
    let mut where_clauses = vec!["is_delete = 0"];
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(start) = &filter.start_time {
        where_clauses.push("timestamp >= ?");
        params.push(Box::new(start.clone()));
    }

    if let Some(end) = &filter.end_time {
        where_clauses.push("timestamp <= ?");
        params.push(Box::new(end.clone()));
    }

    if let Some(text) = &filter.search_text {
        where_clauses.push("instr(content, ?) > 0");
        params.push(Box::new(text.clone()));
    }

    let order_clause = match filter.sort {
        Some(SortOrder::Ascend) => "ORDER BY timestamp ASC, id ASC",
        Some(SortOrder::Descend) => "ORDER BY timestamp DESC, id DESC",
        None => "",
    };

    let limit_clause = match (filter.limit, filter.offset) {
        (None, None) => String::new(),
        (limit, offset) => {
            params.push(Box::new(limit.map(|l| l as i64).unwrap_or(-1)));
            params.push(Box::new(offset.unwrap_or(0) as i64));
            "LIMIT ? OFFSET ?".to_string()
        }
    };

    let sql = format!(
        r#"
        SELECT id, timestamp, content
        FROM "{}"
        WHERE {}
        {}
        {}
        "#,
        table.as_str(),
        where_clauses.join(" AND "),
        order_clause,
        limit_clause
    );

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let rows = stmt
        .query_map(param_refs.as_slice(), |row| {
            Ok(LogRow {
                id: row.get(0)?,
                timestamp: row.get(1)?,
                content: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
