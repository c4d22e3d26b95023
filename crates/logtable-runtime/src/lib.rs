// Runtime module - orchestrates reading, parsing and loading
// Owns the pipeline loop, cancellation and configuration; storage and
// segmentation live in logtable-index and logtable-engine

pub mod api;
pub mod cancel;
pub mod config;
pub mod error;
pub mod ops;
pub mod progress;
pub mod reader;
pub mod workspace;

pub use cancel::{CancelToken, StopReason};
pub use config::{Config, resolve_workspace_path};
pub use error::{Error, Result};
pub use ops::{
    CleanupService, ClearReport, DeleteOutcome, IngestOptions, IngestService, IngestStatus,
    IngestSummary, QueryService,
};
pub use progress::{ProgressSender, progress_channel};
pub use reader::{Chunk, ChunkReader, count_lines, read_lines};
pub use workspace::LogTable;
