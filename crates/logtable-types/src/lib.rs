pub mod error;
pub mod progress;
pub mod query;
pub mod record;
pub mod reply;
pub mod session;

pub use error::{Error, Result};
pub use progress::{ProgressEvent, percentage};
pub use query::{QueryFilter, SortOrder};
pub use record::{LogRecord, LogRow};
pub use reply::Reply;
pub use session::{RegistryEntry, SessionInfo, TableName};
