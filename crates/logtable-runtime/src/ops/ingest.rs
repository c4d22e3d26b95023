use chrono::Local;
use logtable_engine::{ParserConfig, RecordParser};
use logtable_index::{Atomicity, Database, LoadReport};
use logtable_types::{ProgressEvent, SessionInfo, TableName, percentage};
use serde::Serialize;
use std::path::Path;

use crate::cancel::{CancelToken, StopReason};
use crate::config::Config;
use crate::reader::{ChunkReader, count_lines};
use crate::{Error, Result};

/// Knobs for one ingestion run.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub chunk_size: usize,
    pub batch_size: usize,
    pub atomicity: Atomicity,
    pub parser: ParserConfig,
}

impl From<&Config> for IngestOptions {
    fn from(config: &Config) -> Self {
        Self {
            chunk_size: config.ingest.chunk_size,
            batch_size: config.ingest.batch_size,
            atomicity: config.ingest.atomicity,
            parser: config.parser.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestStatus {
    Completed,
    Cancelled,
    TimedOut,
}

impl From<StopReason> for IngestStatus {
    fn from(reason: StopReason) -> Self {
        match reason {
            StopReason::Cancelled => IngestStatus::Cancelled,
            StopReason::TimedOut => IngestStatus::TimedOut,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestSummary {
    #[serde(flatten)]
    pub session: SessionInfo,
    pub status: IngestStatus,
    pub chunks: u64,
    pub processed_lines: u64,
    pub records_inserted: u64,
    /// Records lost to failed batches (or rolled-back chunks).
    pub failed_records: u64,
    /// Lines before the first record boundary.
    pub unmatched_lines: u64,
    /// An open record was dropped because the session stopped early.
    pub discarded_carry_over: bool,
    pub errors: Vec<String>,
}

impl IngestSummary {
    pub fn is_partial(&self) -> bool {
        self.status != IngestStatus::Completed || self.failed_records > 0
    }

    pub fn message(&self) -> String {
        let table = &self.session.table_name;
        let mut msg = match self.status {
            IngestStatus::Completed => format!(
                "Ingested {} records into {}",
                self.records_inserted, table
            ),
            IngestStatus::Cancelled => format!(
                "Cancelled after {} lines; {} records kept in {}",
                self.processed_lines, self.records_inserted, table
            ),
            IngestStatus::TimedOut => format!(
                "Timed out after {} lines; {} records kept in {}",
                self.processed_lines, self.records_inserted, table
            ),
        };
        if self.failed_records > 0 {
            msg.push_str(&format!(" ({} records failed to load)", self.failed_records));
        }
        msg
    }
}

/// Chunked file → records → session table pipeline.
pub struct IngestService<'a> {
    db: &'a Database,
    options: IngestOptions,
}

impl<'a> IngestService<'a> {
    pub fn new(db: &'a Database, options: IngestOptions) -> Self {
        Self { db, options }
    }

    /// Ingest `path` into a freshly provisioned session table.
    ///
    /// `on_progress` runs once per non-empty chunk, after the chunk's records
    /// are loaded; its batch holds only the records that were committed.
    ///
    /// The token is polled before each chunk; on stop, the record still being
    /// accumulated is discarded and the summary is partial.
    pub fn run<F>(
        &self,
        path: &Path,
        cancel: &CancelToken,
        mut on_progress: F,
    ) -> Result<IngestSummary>
    where
        F: FnMut(ProgressEvent),
    {
        let estimated_lines = count_lines(path)?;
        let mut parser = RecordParser::new(&self.options.parser)?;

        let now = Local::now();
        let table = TableName::generate(now);
        let provisioned = self.db.provision(&table)?;
        if !provisioned.registered || !provisioned.created {
            tracing::warn!(table = %table, "session table was already present");
        }

        let session = SessionInfo {
            table_name: table.clone(),
            created_at: now.format("%Y-%m-%d %H:%M:%S").to_string(),
            estimated_lines,
            source: path.to_path_buf(),
        };
        tracing::info!(
            table = %table,
            path = %path.display(),
            estimated_lines,
            chunk_size = self.options.chunk_size,
            batch_size = self.options.batch_size,
            "session opened"
        );

        let mut reader = ChunkReader::open(path, self.options.chunk_size)?;
        let mut status = IngestStatus::Completed;
        let mut chunks = 0u64;
        let mut processed_lines = 0u64;
        let mut last_progress = 0u8;
        let mut load = LoadReport::default();

        loop {
            if let Some(reason) = cancel.stop_reason() {
                status = reason.into();
                break;
            }

            let Some(chunk) = reader
                .next_chunk()
                .map_err(|e| Error::file_access(path, e))?
            else {
                break;
            };

            let mut records = parser.feed(&chunk.lines);
            if chunk.is_last {
                records.extend(parser.finish());
            }

            let report = self.db.insert_records(
                &table,
                &records,
                self.options.batch_size,
                self.options.atomicity,
            )?;
            for error in &report.errors {
                tracing::warn!(table = %table, first_line = chunk.first_line, "{}", error);
            }
            load.merge(&report);
            let committed = if report.is_clean() {
                records
            } else {
                report.committed_records(&records)
            };

            chunks += 1;
            processed_lines += chunk.len() as u64;
            let progress = if chunk.is_last {
                100
            } else {
                percentage(processed_lines, estimated_lines).max(last_progress)
            };
            last_progress = progress;

            tracing::debug!(
                table = %table,
                lines = %format!("{}..={}", chunk.first_line, chunk.last_line),
                records = committed.len(),
                failed = report.failed,
                progress,
                "chunk loaded"
            );

            on_progress(ProgressEvent {
                table_name: table.to_string(),
                batch: committed,
                progress,
            });

            if chunk.is_last {
                break;
            }
        }

        let stopped_early = status != IngestStatus::Completed;
        let discarded_carry_over = stopped_early && parser.discard_carry_over();
        if stopped_early {
            tracing::warn!(
                table = %table,
                ?status,
                processed_lines,
                discarded_carry_over,
                "session stopped early"
            );
        }

        let stats = parser.stats();
        let summary = IngestSummary {
            session,
            status,
            chunks,
            processed_lines,
            records_inserted: load.inserted,
            failed_records: load.failed,
            unmatched_lines: stats.unmatched_lines,
            discarded_carry_over,
            errors: load.errors,
        };

        tracing::info!(
            table = %table,
            records = summary.records_inserted,
            failed = summary.failed_records,
            unmatched = summary.unmatched_lines,
            "session finished"
        );

        Ok(summary)
    }
}
