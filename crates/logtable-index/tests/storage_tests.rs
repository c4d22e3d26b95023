//! Integration tests for the storage layer
//!
//! These exercise Database through its public API only, against both
//! in-memory and file-backed databases.

use logtable_index::{Atomicity, Database};
use logtable_types::{LogRecord, QueryFilter, SortOrder, TableName};
use rusqlite::Connection;
use tempfile::TempDir;

fn table(name: &str) -> TableName {
    TableName::parse(name).unwrap()
}

fn minute_records(n: usize) -> Vec<LogRecord> {
    (0..n)
        .map(|i| {
            LogRecord::new(
                format!("2024-03-01 10:{:02}:00.000", i),
                format!("2024-03-01T10:{:02}:00.000+00:00 event {}", i, i),
            )
        })
        .collect()
}

#[test]
fn test_round_trip_across_batch_sizes() {
    for batch_size in [1, 7, 500, 10_000] {
        let db = Database::open_in_memory().unwrap();
        let t = table("log_round_trip");
        db.provision(&t).unwrap();

        let input = minute_records(50);
        let report = db
            .insert_records(&t, &input, batch_size, Atomicity::PerBatch)
            .unwrap();
        assert_eq!(report.inserted, 50, "batch_size {}", batch_size);

        let rows = db
            .query(&t, &QueryFilter::new().sort(SortOrder::Ascend))
            .unwrap()
            .unwrap();
        assert_eq!(rows.len(), 50);
        for (row, record) in rows.iter().zip(&input) {
            assert_eq!(row.timestamp, record.timestamp);
            assert_eq!(row.content, record.content);
        }
        assert!(rows.windows(2).all(|w| w[0].id < w[1].id));
    }
}

#[test]
fn test_filters_combine_with_and() {
    let db = Database::open_in_memory().unwrap();
    let t = table("log_filters");
    db.provision(&t).unwrap();
    db.insert_records(&t, &minute_records(30), 100, Atomicity::PerBatch)
        .unwrap();

    let filter = QueryFilter::new()
        .start_time("2024-03-01 10:05:00.000")
        .end_time("2024-03-01 10:20:00.000")
        .search("event 1")
        .sort(SortOrder::Descend);
    let rows = db.query(&t, &filter).unwrap().unwrap();

    // Minutes 10..=19 contain "event 1"; minute 1 is outside the range
    let contents: Vec<_> = rows.iter().map(|r| r.content.clone()).collect();
    assert_eq!(rows.len(), 10);
    assert!(contents[0].ends_with("event 19"));
    assert!(contents[9].ends_with("event 10"));
}

#[test]
fn test_bounds_are_inclusive() {
    let db = Database::open_in_memory().unwrap();
    let t = table("log_bounds");
    db.provision(&t).unwrap();
    db.insert_records(&t, &minute_records(5), 100, Atomicity::PerBatch)
        .unwrap();

    let filter = QueryFilter::new()
        .start_time("2024-03-01 10:01:00.000")
        .end_time("2024-03-01 10:03:00.000");
    assert_eq!(db.query(&t, &filter).unwrap().unwrap().len(), 3);
}

#[test]
fn test_equal_timestamps_fall_back_to_insertion_order() {
    let db = Database::open_in_memory().unwrap();
    let t = table("log_ties");
    db.provision(&t).unwrap();
    let input: Vec<_> = (0..4)
        .map(|i| LogRecord::new("2024-03-01 10:00:00.000", format!("same {}", i)))
        .collect();
    db.insert_records(&t, &input, 2, Atomicity::PerBatch)
        .unwrap();

    let asc = db
        .query(&t, &QueryFilter::new().sort(SortOrder::Ascend))
        .unwrap()
        .unwrap();
    let desc = db
        .query(&t, &QueryFilter::new().sort(SortOrder::Descend))
        .unwrap()
        .unwrap();

    assert_eq!(asc[0].content, "same 0");
    assert_eq!(desc[0].content, "same 3");
}

#[test]
fn test_per_chunk_failure_rolls_back_every_batch() {
    let db = Database::open_in_memory().unwrap();
    let t = table("log_strict");

    // Pre-create the table with a constraint the third record violates
    db.register(&t).unwrap();
    db.with_connection(|conn| {
        conn.execute_batch(
            r#"
            CREATE TABLE "log_strict" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                content TEXT NOT NULL CHECK (content <> 'poison'),
                created_at TEXT,
                updated_at TEXT,
                is_delete BOOLEAN DEFAULT false
            );
            "#,
        )?;
        Ok(())
    })
    .unwrap();

    let mut input = minute_records(5);
    input[2].content = "poison".to_string();

    let strict = db
        .insert_records(&t, &input, 2, Atomicity::PerChunk)
        .unwrap();
    assert_eq!(strict.inserted, 0);
    assert_eq!(strict.failed, 5);
    assert!(strict.committed_records(&input).is_empty());
    assert_eq!(db.count_rows(&t).unwrap(), 0);

    let lenient = db
        .insert_records(&t, &input, 2, Atomicity::PerBatch)
        .unwrap();
    assert_eq!(lenient.inserted, 3);
    assert_eq!(lenient.failed, 2);
    assert_eq!(lenient.errors.len(), 1);
    assert_eq!(db.count_rows(&t).unwrap(), 3);

    // Only the batches that committed are reported back: [0, 1] and [4]
    let committed = lenient.committed_records(&input);
    let kept: Vec<_> = committed.iter().map(|r| r.content.as_str()).collect();
    let expected: Vec<_> = [0, 1, 4].iter().map(|&i| input[i].content.as_str()).collect();
    assert_eq!(kept, expected);
}

#[test]
fn test_orphaned_registry_entry_is_visible() {
    let db = Database::open_in_memory().unwrap();
    let t = table("log_crashed");
    db.register(&t).unwrap();

    let statuses = db.table_statuses().unwrap();
    assert_eq!(statuses.len(), 1);
    assert!(statuses[0].is_orphan());

    // Provisioning again completes the half-done session without a duplicate
    let provisioned = db.provision(&t).unwrap();
    assert!(!provisioned.registered);
    assert!(provisioned.created);
    assert_eq!(db.list_registry().unwrap().len(), 1);
}

#[test]
fn test_unparseable_registry_name_is_reported_missing() {
    let db = Database::open_in_memory().unwrap();
    db.with_connection(|conn| {
        conn.execute(
            "INSERT INTO log_history (table_name) VALUES ('Not A Table')",
            [],
        )?;
        Ok(())
    })
    .unwrap();

    let statuses = db.table_statuses().unwrap();
    assert_eq!(statuses.len(), 1);
    assert!(!statuses[0].exists);
}

#[test]
fn test_file_backed_database_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("logtable.db");
    let t = table("log_persisted");

    {
        let db = Database::open(&path).unwrap();
        db.provision(&t).unwrap();
        db.insert_records(&t, &minute_records(3), 10, Atomicity::PerBatch)
            .unwrap();
    }

    let db = Database::open(&path).unwrap();
    assert_eq!(db.count_rows(&t).unwrap(), 3);
    assert_eq!(db.list_registry().unwrap()[0].table_name, "log_persisted");

    db.drop_session_table(&t).unwrap();
    db.unregister(t.as_str()).unwrap();
    db.vacuum().unwrap();
    assert!(db.list_registry().unwrap().is_empty());
}

#[test]
fn test_newer_schema_version_is_refused() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute("PRAGMA user_version = 42", []).unwrap();
    drop(conn);

    assert!(Database::open(&path).is_err());
}
