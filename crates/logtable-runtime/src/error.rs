use std::fmt;
use std::path::PathBuf;

/// Result type for logtable-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// Source log file is missing or unreadable
    FileAccess {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Boundary pattern or strategy is unusable
    Parse(logtable_engine::Error),

    /// Storage layer error (provisioning, loading, cleanup)
    Index(logtable_index::Error),

    /// Table name rejected by identifier validation
    InvalidTableName(logtable_types::Error),

    /// Configuration error
    Config(String),

    /// IO operation failed
    Io(std::io::Error),
}

impl Error {
    pub(crate) fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::FileAccess {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::FileAccess { path, source } => {
                write!(f, "Cannot read {}: {}", path.display(), source)
            }
            Error::Parse(err) => write!(f, "Parse error: {}", err),
            Error::Index(err) => write!(f, "Index error: {}", err),
            Error::InvalidTableName(err) => write!(f, "{}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FileAccess { source, .. } => Some(source),
            Error::Parse(err) => Some(err),
            Error::Index(err) => Some(err),
            Error::InvalidTableName(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Config(_) => None,
        }
    }
}

impl From<logtable_engine::Error> for Error {
    fn from(err: logtable_engine::Error) -> Self {
        Error::Parse(err)
    }
}

impl From<logtable_index::Error> for Error {
    fn from(err: logtable_index::Error) -> Self {
        Error::Index(err)
    }
}

impl From<logtable_types::Error> for Error {
    fn from(err: logtable_types::Error) -> Self {
        Error::InvalidTableName(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}
