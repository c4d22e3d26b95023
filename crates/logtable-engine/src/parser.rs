use logtable_types::LogRecord;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::timestamp::{TimeBasis, normalize_with};
use crate::{Error, Result};

/// ISO-8601 timestamp with milliseconds and a `±HH:MM` offset.
pub const DEFAULT_BOUNDARY: &str =
    r"(?P<timestamp>\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}[+-]\d{2}:\d{2})";

const TIMESTAMP_GROUP: &str = "timestamp";

static DEFAULT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&anchored(DEFAULT_BOUNDARY)).unwrap());

fn anchored(pattern: &str) -> String {
    format!("^(?:{})", pattern)
}

/// How record boundaries are recognized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Boundary pattern; `None` uses [`DEFAULT_BOUNDARY`]. Matched at the
    /// start of a line.
    #[serde(default)]
    pub pattern: Option<String>,
    /// Named capture groups copied into [`LogRecord::fields`].
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub time_basis: TimeBasis,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Records emitted so far.
    pub records: u64,
    /// Lines seen before the first boundary; these are dropped.
    pub unmatched_lines: u64,
}

#[derive(Debug)]
struct Pending {
    timestamp: String,
    fields: BTreeMap<String, String>,
    content: String,
}

impl Pending {
    fn into_record(self) -> LogRecord {
        let mut content = self.content;
        content.truncate(content.trim_end().len());
        LogRecord {
            timestamp: self.timestamp,
            content,
            fields: self.fields,
        }
    }
}

/// Streaming line scanner with two states: seeking the first boundary, and
/// accumulating the current record.
///
/// A line that starts with a boundary token closes the current record and
/// opens a new one; any other line is a continuation. The open record at the
/// end of a chunk is carried over into the next [`feed`](Self::feed) call, so
/// feeding a file in windows of any size yields exactly the records of a
/// single pass.
#[derive(Debug)]
pub struct RecordParser {
    boundary: Regex,
    fields: Vec<String>,
    basis: TimeBasis,
    pending: Option<Pending>,
    stats: ParseStats,
}

impl RecordParser {
    pub fn new(config: &ParserConfig) -> Result<Self> {
        let boundary = match &config.pattern {
            None => DEFAULT_REGEX.clone(),
            Some(pattern) => {
                Regex::new(&anchored(pattern)).map_err(|source| Error::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })?
            }
        };

        for field in &config.fields {
            if !boundary.capture_names().flatten().any(|name| name == field) {
                return Err(Error::UnknownField {
                    field: field.clone(),
                    pattern: config
                        .pattern
                        .clone()
                        .unwrap_or_else(|| DEFAULT_BOUNDARY.to_string()),
                });
            }
        }

        Ok(Self {
            boundary,
            fields: config.fields.clone(),
            basis: config.time_basis,
            pending: None,
            stats: ParseStats::default(),
        })
    }

    /// Feed one line (without its terminator). Returns the record it closed,
    /// if any.
    pub fn feed_line(&mut self, line: &str) -> Option<LogRecord> {
        let Some(caps) = self.boundary.captures(line) else {
            match &mut self.pending {
                Some(pending) => {
                    pending.content.push('\n');
                    pending.content.push_str(line);
                }
                None => self.stats.unmatched_lines += 1,
            }
            return None;
        };

        let token = caps
            .name(TIMESTAMP_GROUP)
            .or_else(|| caps.get(0))
            .map(|m| m.as_str())
            .unwrap_or_default();

        let fields = self
            .fields
            .iter()
            .filter_map(|name| {
                caps.name(name)
                    .map(|m| (name.clone(), m.as_str().to_string()))
            })
            .collect();

        let next = Pending {
            timestamp: normalize_with(token, self.basis),
            fields,
            content: line.to_string(),
        };

        self.pending.replace(next).map(|done| self.emit(done))
    }

    /// Feed a window of lines; returns every record closed inside it.
    pub fn feed<I, S>(&mut self, lines: I) -> Vec<LogRecord>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lines
            .into_iter()
            .filter_map(|line| self.feed_line(line.as_ref()))
            .collect()
    }

    /// Feed newline-separated text (`\n` or `\r\n`).
    pub fn feed_text(&mut self, text: &str) -> Vec<LogRecord> {
        self.feed(text.lines())
    }

    /// Flush the carried-over record at end of input.
    pub fn finish(&mut self) -> Option<LogRecord> {
        self.pending.take().map(|done| self.emit(done))
    }

    pub fn has_carry_over(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the carried-over record without emitting it. Used when input
    /// stops early and the record may be missing continuation lines.
    pub fn discard_carry_over(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    fn emit(&mut self, pending: Pending) -> LogRecord {
        self.stats.records += 1;
        pending.into_record()
    }
}
