use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::{Error, Result};

const TABLE_PREFIX: &str = "log_";
const MAX_SUFFIX_LEN: usize = 96;

/// Name of the registry table. Shares the session prefix, so it is reserved.
pub const REGISTRY_TABLE: &str = "log_history";

/// Validated identifier of a session table.
///
/// Session tables are addressed by name in DDL, where bind parameters are not
/// available, so every name crossing an API boundary goes through
/// [`TableName::parse`]. Only `log_` followed by `[a-z0-9_]` is accepted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableName(String);

impl TableName {
    pub fn parse(name: &str) -> Result<Self> {
        let Some(suffix) = name.strip_prefix(TABLE_PREFIX) else {
            return Err(Error::InvalidTableName(name.to_string()));
        };

        let valid = !suffix.is_empty()
            && suffix.len() <= MAX_SUFFIX_LEN
            && suffix
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');

        if valid && name != REGISTRY_TABLE {
            Ok(Self(name.to_string()))
        } else {
            Err(Error::InvalidTableName(name.to_string()))
        }
    }

    /// Generate a fresh name: `log_<YYYYMMDD>_<HHMMSS>_<8 hex>`.
    ///
    /// The random suffix keeps two ingestions started within the same second
    /// apart.
    pub fn generate(now: DateTime<Local>) -> Self {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Self(format!(
            "{}{}_{}",
            TABLE_PREFIX,
            now.format("%Y%m%d_%H%M%S"),
            &suffix[..8]
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TableName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<TableName> for String {
    fn from(name: TableName) -> Self {
        name.0
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Registry row describing one session table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub id: i64,
    pub table_name: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// A live ingestion session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub table_name: TableName,
    /// Local time the session was opened (`YYYY-MM-DD HH:MM:SS`).
    pub created_at: String,
    /// Line count measured before ingestion; used for progress only.
    pub estimated_lines: u64,
    pub source: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_accepts_generated_shape() {
        let name = TableName::parse("log_20240101_100000_ab12cd34").unwrap();
        assert_eq!(name.as_str(), "log_20240101_100000_ab12cd34");
    }

    #[test]
    fn test_parse_rejects_injection_attempts() {
        for bad in [
            "",
            "log_",
            "dataset",
            "LOG_abc",
            "log_ABC",
            "log_x; DROP TABLE log_history",
            "log_x\"",
            "log_x-y",
            REGISTRY_TABLE,
        ] {
            assert!(TableName::parse(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_parse_rejects_overlong_names() {
        let long = format!("log_{}", "a".repeat(MAX_SUFFIX_LEN + 1));
        assert!(TableName::parse(&long).is_err());
    }

    #[test]
    fn test_generate_is_valid_and_unique() {
        let now = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let a = TableName::generate(now);
        let b = TableName::generate(now);

        assert!(a.as_str().starts_with("log_20240102_030405_"));
        assert!(TableName::parse(a.as_str()).is_ok());
        assert_ne!(a, b);
    }

    #[test]
    fn test_serde_validates_on_deserialize() {
        let ok: TableName = serde_json::from_str("\"log_abc\"").unwrap();
        assert_eq!(ok.as_str(), "log_abc");

        let bad = serde_json::from_str::<TableName>("\"sqlite_master\"");
        assert!(bad.is_err());
    }
}
