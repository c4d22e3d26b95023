// SQLite storage for ingested logs
// One registry table plus one table per ingestion session

mod db;
mod error;
mod queries;
mod records;
mod schema;

// Public API
pub use db::{DEFAULT_BUSY_TIMEOUT, Database};
pub use error::{Error, Result};
pub use queries::session_table::{Atomicity, LoadReport};
pub use records::{Provisioned, TableStatus};
pub use schema::SCHEMA_VERSION;
