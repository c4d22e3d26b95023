use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordering of query results by timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "ascend")]
    Ascend,
    #[serde(rename = "descend")]
    Descend,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascend => write!(f, "ascend"),
            SortOrder::Descend => write!(f, "descend"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascend" | "asc" => Ok(SortOrder::Ascend),
            "descend" | "desc" => Ok(SortOrder::Descend),
            other => Err(format!(
                "unknown sort order '{}', expected 'ascend' or 'descend'",
                other
            )),
        }
    }
}

/// Filters applied to a session table query. All present filters combine
/// with AND.
///
/// Without `sort`, row order is whatever SQLite returns and must not be
/// relied on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFilter {
    /// Inclusive lower bound on the normalized timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// Inclusive upper bound on the normalized timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    /// Case-sensitive substring of `content`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_text: Option<String>,
    #[serde(default, rename = "sort_type", skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl QueryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_time(mut self, ts: impl Into<String>) -> Self {
        self.start_time = Some(ts.into());
        self
    }

    pub fn end_time(mut self, ts: impl Into<String>) -> Self {
        self.end_time = Some(ts.into());
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    pub fn sort(mut self, order: SortOrder) -> Self {
        self.sort = Some(order);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_wire_names() {
        assert_eq!(
            serde_json::to_string(&SortOrder::Ascend).unwrap(),
            "\"ascend\""
        );
        assert_eq!("descend".parse::<SortOrder>(), Ok(SortOrder::Descend));
        assert!("sideways".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_filter_deserializes_sort_type() {
        let filter: QueryFilter =
            serde_json::from_str(r#"{"search_text":"ERROR","sort_type":"descend"}"#).unwrap();
        assert_eq!(filter.search_text.as_deref(), Some("ERROR"));
        assert_eq!(filter.sort, Some(SortOrder::Descend));
        assert!(filter.start_time.is_none());
    }
}
