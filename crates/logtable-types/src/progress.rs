use serde::{Deserialize, Serialize};

use crate::LogRecord;

/// One progress notification, sent after each chunk has been loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub table_name: String,
    /// Records inserted while processing this chunk.
    pub batch: Vec<LogRecord>,
    /// Percentage in `0..=100`, non-decreasing within a session.
    pub progress: u8,
}

/// `clamp(round(processed / total * 100), 0, 100)`.
///
/// An unknown (zero) total reports 100 once anything was processed.
pub fn percentage(processed: u64, total: u64) -> u8 {
    if total == 0 {
        return if processed == 0 { 0 } else { 100 };
    }
    let pct = (processed as f64 / total as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}
