pub mod cleanup;
pub mod ingest;
pub mod query;

pub use cleanup::{CleanupService, ClearReport, DeleteOutcome};
pub use ingest::{IngestOptions, IngestService, IngestStatus, IngestSummary};
pub use query::QueryService;
