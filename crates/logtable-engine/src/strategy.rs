use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::parser::ParserConfig;
use crate::timestamp::TimeBasis;
use crate::{Error, Result};

/// A parse strategy produced by an external format analyzer: a boundary
/// pattern plus the named groups worth keeping.
///
/// ```json
/// { "pattern": "\\[(?P<timestamp>[^\\]]+)\\] (?P<level>[A-Z]+)", "fields": ["level"] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStrategy {
    pub pattern: String,
    #[serde(default)]
    pub fields: Vec<String>,
}

impl ParseStrategy {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn into_config(self, time_basis: TimeBasis) -> ParserConfig {
        ParserConfig {
            pattern: Some(self.pattern),
            fields: self
                .fields
                .into_iter()
                .filter(|f| f != "timestamp" && f != "content")
                .collect(),
            time_basis,
        }
    }
}
