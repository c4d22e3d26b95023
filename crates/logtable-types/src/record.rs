use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One parsed log record, ready to be persisted.
///
/// `content` keeps the raw text of the record, including the original
/// (un-normalized) timestamp token and every continuation line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Normalized timestamp (`YYYY-MM-DD HH:mm:ss.mmm`).
    pub timestamp: String,
    /// Raw record text, trailing whitespace trimmed.
    pub content: String,
    /// Extra named captures from a field strategy. Never persisted.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
}

impl LogRecord {
    pub fn new(timestamp: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            content: content.into(),
            fields: BTreeMap::new(),
        }
    }
}

/// A record read back from a session table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRow {
    /// Sequence id assigned by storage, monotonic within a table.
    pub id: i64,
    pub timestamp: String,
    pub content: String,
}
