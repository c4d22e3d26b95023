//! End-to-end tests for the ingestion pipeline against a file-backed data
//! directory.

use logtable_engine::{ParserConfig, parse_text};
use logtable_runtime::api::{self, QueryRequest};
use logtable_runtime::{
    CancelToken, Config, IngestStatus, LogTable, progress_channel, read_lines,
};
use logtable_testing::LogBuilder;
use logtable_testing::fixtures::{TWO_RECORD_LOG, write_log};
use logtable_types::{QueryFilter, SortOrder};
use std::thread;
use tempfile::TempDir;

fn open(dir: &TempDir, chunk_size: usize, batch_size: usize) -> LogTable {
    let mut config = Config::default();
    config.ingest.chunk_size = chunk_size;
    config.ingest.batch_size = batch_size;
    LogTable::open_with_config(dir.path().join("data"), config).unwrap()
}

#[test]
fn test_chunked_ingest_matches_single_pass() {
    let dir = TempDir::new().unwrap();
    let builder = LogBuilder::new(40)
        .with_stack_traces(3, 4)
        .with_preamble("=== service boot ===");
    let content = builder.build();
    let path = write_log(&dir.path().join("app.log"), &content).unwrap();

    let expected = parse_text(&content, &ParserConfig::default()).unwrap();
    assert_eq!(expected.len(), 40);

    for chunk_size in [1, 2, 5, 7, 64, 10_000] {
        let workspace = open(&dir, chunk_size, 3);
        let summary = workspace
            .ingest()
            .run(&path, &CancelToken::new(), |_| {})
            .unwrap();
        assert_eq!(summary.status, IngestStatus::Completed);
        assert_eq!(summary.records_inserted, 40, "chunk_size {}", chunk_size);
        assert_eq!(summary.unmatched_lines, 1);

        let rows = workspace
            .query()
            .run(
                &summary.session.table_name,
                QueryFilter::new().sort(SortOrder::Ascend),
            )
            .unwrap()
            .unwrap();
        let got: Vec<_> = rows.iter().map(|r| (&r.timestamp, &r.content)).collect();
        let want: Vec<_> = expected.iter().map(|r| (&r.timestamp, &r.content)).collect();
        assert_eq!(got, want, "chunk_size {}", chunk_size);
    }
}

#[test]
fn test_progress_through_bounded_channel() {
    let dir = TempDir::new().unwrap();
    let builder = LogBuilder::new(25);
    let path = builder.write_to(&dir.path().join("app.log")).unwrap();
    let workspace = open(&dir, 4, 500);

    let (tx, rx) = progress_channel(1);
    let consumer = thread::spawn(move || rx.iter().collect::<Vec<_>>());

    let summary = workspace
        .ingest()
        .run(&path, &CancelToken::new(), |event| tx.send(event))
        .unwrap();
    drop(tx);
    let events = consumer.join().unwrap();

    // ceil(25 / 4) chunks, one event each
    assert_eq!(events.len(), 7);
    let progress: Vec<u8> = events.iter().map(|e| e.progress).collect();
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(progress.last(), Some(&100));

    let batched: usize = events.iter().map(|e| e.batch.len()).sum();
    assert_eq!(batched as u64, summary.records_inserted);
    assert!(
        events
            .iter()
            .all(|e| e.table_name == summary.session.table_name.as_str())
    );
}

#[test]
fn test_api_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir.path().join("two.log"), TWO_RECORD_LOG).unwrap();
    let workspace = open(&dir, 5000, 500);

    let ingested = api::ingest_log(&workspace, Some(path.as_path()), None);
    assert!(ingested.ok, "{}", ingested.msg);
    let table_name = ingested.data;

    let reply = api::query_log(
        &workspace,
        QueryRequest {
            table_name: table_name.clone(),
            filter: QueryFilter::new().search("WARN"),
        },
    );
    assert!(reply.ok);
    assert_eq!(reply.data.len(), 1);
    assert_eq!(reply.data[0].timestamp, "2024-01-01 10:00:01.500");

    let deleted = api::delete_log(&workspace, &table_name);
    assert!(deleted.ok);

    let gone = api::query_log(
        &workspace,
        QueryRequest {
            table_name,
            filter: QueryFilter::new(),
        },
    );
    assert!(gone.ok);
    assert!(gone.data.is_empty());
    assert!(gone.msg.contains("does not exist"));
}

#[test]
fn test_api_rejects_bad_input_without_panicking() {
    let dir = TempDir::new().unwrap();
    let workspace = open(&dir, 5000, 500);

    let no_file = api::ingest_log(&workspace, None, None);
    assert!(no_file.ok);
    assert!(no_file.data.is_empty());

    let absent = dir.path().join("absent.log");
    let missing = api::ingest_log(&workspace, Some(absent.as_path()), None);
    assert!(!missing.ok);

    let injected = api::delete_log(&workspace, "log_x; DROP TABLE log_history");
    assert!(!injected.ok);

    let request: QueryRequest =
        serde_json::from_str(r#"{"table_name": "sqlite_master", "sort_type": "ascend"}"#)
            .unwrap();
    let not_a_session = api::query_log(&workspace, request);
    assert!(not_a_session.ok);
    assert!(not_a_session.data.is_empty());
    assert!(not_a_session.msg.contains("not a session table"));
}

#[test]
fn test_api_query_ignores_empty_form_fields() {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir.path().join("two.log"), TWO_RECORD_LOG).unwrap();
    let workspace = open(&dir, 5000, 500);
    let table_name = api::ingest_log(&workspace, Some(path.as_path()), None).data;

    let request: QueryRequest = serde_json::from_value(serde_json::json!({
        "table_name": table_name,
        "start_time": "",
        "end_time": "",
        "search_text": "",
    }))
    .unwrap();
    let reply = api::query_log(&workspace, request);
    assert!(reply.ok);
    assert_eq!(reply.data.len(), 2);
}

#[test]
fn test_api_ingest_forwards_progress() {
    let dir = TempDir::new().unwrap();
    let path = LogBuilder::new(10)
        .write_to(&dir.path().join("app.log"))
        .unwrap();
    let workspace = open(&dir, 3, 500);

    let (tx, rx) = progress_channel(1);
    let consumer = thread::spawn(move || rx.iter().collect::<Vec<_>>());
    let reply = api::ingest_log(&workspace, Some(path.as_path()), Some(&tx));
    drop(tx);
    let events = consumer.join().unwrap();

    assert!(reply.ok, "{}", reply.msg);
    // ceil(10 / 3) chunks
    assert_eq!(events.len(), 4);
    assert_eq!(events.last().map(|e| e.progress), Some(100));
    assert!(events.iter().all(|e| e.table_name == reply.data));
    assert_eq!(events.iter().map(|e| e.batch.len()).sum::<usize>(), 10);
}

#[test]
fn test_clear_all_twice() {
    let dir = TempDir::new().unwrap();
    let path = LogBuilder::new(3)
        .write_to(&dir.path().join("app.log"))
        .unwrap();
    let workspace = open(&dir, 5000, 500);

    for _ in 0..3 {
        assert!(api::ingest_log(&workspace, Some(path.as_path()), None).ok);
    }

    let first = api::clear_all_log(&workspace);
    assert!(first.ok);
    assert_eq!(first.data.len(), 3);

    let second = api::clear_all_log(&workspace);
    assert!(second.ok);
    assert!(second.data.is_empty());
}

#[test]
fn test_reopened_workspace_sees_previous_sessions() {
    let dir = TempDir::new().unwrap();
    let path = LogBuilder::new(12)
        .write_to(&dir.path().join("app.log"))
        .unwrap();

    let table = {
        let workspace = open(&dir, 5, 5);
        api::ingest_log(&workspace, Some(path.as_path()), None).data
    };

    let workspace = open(&dir, 5000, 500);
    let listed = workspace.cleanup().list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].entry.table_name, table);
    assert_eq!(listed[0].rows, Some(12));
}

#[test]
fn test_read_lines_windows_do_not_overlap() {
    let dir = TempDir::new().unwrap();
    let content: String = (1..=10).map(|i| format!("line {}\n", i)).collect();
    let path = write_log(&dir.path().join("plain.log"), &content).unwrap();

    let mut joined = Vec::new();
    for start in (1..=10).step_by(3) {
        let window = read_lines(&path, start, start + 2).unwrap();
        joined.extend(window.lines().map(str::to_string));
    }
    let expected: Vec<_> = (1..=10).map(|i| format!("line {}", i)).collect();
    assert_eq!(joined, expected);
}
