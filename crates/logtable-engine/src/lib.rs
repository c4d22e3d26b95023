// Engine module - pure record segmentation (no I/O besides strategy loading)
// This layer sits between raw file lines (runtime) and persisted rows (index)

pub mod error;
pub mod parser;
pub mod strategy;
pub mod timestamp;

pub use error::{Error, Result};
pub use parser::{DEFAULT_BOUNDARY, ParseStats, ParserConfig, RecordParser};
pub use strategy::ParseStrategy;
pub use timestamp::{DISPLAY_FORMAT, TimeBasis, normalize_timestamp, normalize_with};

use logtable_types::LogRecord;

/// Parse a complete text in one pass, flushing the final record.
pub fn parse_text(text: &str, config: &ParserConfig) -> Result<Vec<LogRecord>> {
    let mut parser = RecordParser::new(config)?;
    let mut records = parser.feed_text(text);
    records.extend(parser.finish());
    Ok(records)
}
