use std::fmt;

/// Result type for logtable-index operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the storage layer
#[derive(Debug)]
pub enum Error {
    /// Database operation failed
    Database(rusqlite::Error),

    /// IO operation failed
    Io(std::io::Error),

    /// Table name rejected by identifier validation
    InvalidTableName(logtable_types::Error),

    /// Schema or usage problem (newer schema, bad arguments)
    Query(String),

    /// Another thread panicked while holding the connection lock
    Poisoned,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Database(err) => {
                let msg = err.to_string();
                // Lock contention is the one failure users can act on
                if msg.contains("database is locked") || msg.contains("database is busy") {
                    write!(
                        f,
                        "Database busy: {}. Another process holds the write lock; retry or raise storage.busy_timeout_ms.",
                        msg
                    )
                } else {
                    write!(f, "Database error: {}", err)
                }
            }
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::InvalidTableName(err) => write!(f, "{}", err),
            Error::Query(msg) => write!(f, "Query error: {}", msg),
            Error::Poisoned => write!(f, "Database handle poisoned by a panicked thread"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Database(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::InvalidTableName(err) => Some(err),
            Error::Query(_) | Error::Poisoned => None,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<logtable_types::Error> for Error {
    fn from(err: logtable_types::Error) -> Self {
        Error::InvalidTableName(err)
    }
}
