//! `Reply`-shaped entrypoints for embedding callers.
//!
//! Every function here reports failure through [`Reply::ok`] being false;
//! no error crosses this boundary.

use logtable_types::{LogRow, QueryFilter, RegistryEntry, Reply, TableName};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cancel::CancelToken;
use crate::progress::ProgressSender;
use crate::workspace::LogTable;

/// Ingest a file into a new session table; `data` is the table name.
///
/// Without a path nothing happens and the reply carries empty data. When
/// `progress` is given, one event per loaded chunk is sent through it.
pub fn ingest_log(
    workspace: &LogTable,
    path: Option<&Path>,
    progress: Option<&ProgressSender>,
) -> Reply<String> {
    let Some(path) = path else {
        return Reply::ok(String::new(), "No file selected");
    };

    let cancel = match workspace.config().ingest.timeout() {
        Some(timeout) => CancelToken::with_timeout(timeout),
        None => CancelToken::new(),
    };

    let ingested = workspace.ingest().run(path, &cancel, |event| {
        if let Some(tx) = progress {
            tx.send(event);
        }
    });

    match ingested {
        Ok(summary) if summary.is_partial() => {
            Reply::failed(summary.session.table_name.to_string(), summary.message())
        }
        Ok(summary) => Reply::ok(summary.session.table_name.to_string(), summary.message()),
        Err(err) => Reply::error(err.to_string()),
    }
}

/// Table name plus filters, as sent by a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub table_name: String,
    #[serde(flatten)]
    pub filter: QueryFilter,
}

pub fn query_log(workspace: &LogTable, request: QueryRequest) -> Reply<Vec<LogRow>> {
    // An invalid name can never refer to a session table, so it reads the
    // same as a missing one
    let table = match TableName::parse(&request.table_name) {
        Ok(table) => table,
        Err(_) => {
            let msg = format!("{} is not a session table", request.table_name);
            return Reply::ok(Vec::new(), msg);
        }
    };

    match workspace.query().run(&table, request.filter) {
        Ok(Some(rows)) => {
            let msg = format!("{} rows", rows.len());
            Reply::ok(rows, msg)
        }
        Ok(None) => Reply::ok(Vec::new(), format!("Table {} does not exist", table)),
        Err(err) => Reply::error(err.to_string()),
    }
}

pub fn clear_all_log(workspace: &LogTable) -> Reply<Vec<RegistryEntry>> {
    match workspace.cleanup().clear_all() {
        Ok(report) => {
            let msg = report.message();
            Reply::ok(report.entries, msg)
        }
        Err(err) => Reply::error(err.to_string()),
    }
}

pub fn delete_log(workspace: &LogTable, table_name: &str) -> Reply<()> {
    let table = match TableName::parse(table_name) {
        Ok(table) => table,
        Err(err) => return Reply::error(err.to_string()),
    };

    match workspace.cleanup().delete_one(&table) {
        Ok(outcome) if outcome.found() => Reply::ok((), format!("Deleted {}", table)),
        Ok(_) => Reply::ok((), format!("Nothing to delete for {}", table)),
        Err(err) => Reply::error(err.to_string()),
    }
}
