use std::fmt;
use std::path::PathBuf;

/// Result type for logtable-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while configuring the record parser
#[derive(Debug)]
pub enum Error {
    /// Boundary pattern does not compile
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    /// A strategy declares a field the pattern does not capture
    UnknownField { field: String, pattern: String },

    /// Strategy file could not be read
    Io { path: PathBuf, source: std::io::Error },

    /// Strategy file is not valid JSON
    Strategy(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidPattern { pattern, source } => {
                write!(f, "Invalid boundary pattern '{}': {}", pattern, source)
            }
            Error::UnknownField { field, pattern } => write!(
                f,
                "Field '{}' is not a named capture group of pattern '{}'",
                field, pattern
            ),
            Error::Io { path, source } => {
                write!(f, "Cannot read strategy file {}: {}", path.display(), source)
            }
            Error::Strategy(err) => write!(f, "Malformed strategy: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidPattern { source, .. } => Some(source),
            Error::Io { source, .. } => Some(source),
            Error::Strategy(err) => Some(err),
            Error::UnknownField { .. } => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Strategy(err)
    }
}
