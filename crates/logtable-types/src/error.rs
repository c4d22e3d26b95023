use std::fmt;

/// Result type for logtable-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the types layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A table name failed identifier validation
    InvalidTableName(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidTableName(name) => write!(
                f,
                "Invalid table name '{}': expected 'log_' followed by lowercase letters, digits or '_'",
                name
            ),
        }
    }
}

impl std::error::Error for Error {}
