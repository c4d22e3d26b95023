use logtable_engine::{TimeBasis, normalize_with};
use logtable_index::Database;
use logtable_types::{LogRow, QueryFilter, TableName};

use crate::Result;

pub struct QueryService<'a> {
    db: &'a Database,
    time_basis: TimeBasis,
}

impl<'a> QueryService<'a> {
    pub fn new(db: &'a Database, time_basis: TimeBasis) -> Self {
        Self { db, time_basis }
    }

    /// Run `filter` against one session table; `None` when the table does
    /// not exist.
    ///
    /// Bounds written as ISO-8601 tokens are normalized the same way stored
    /// timestamps were, so `2024-01-01T10:00:00.000+08:00` and
    /// `2024-01-01 10:00:00.000` select the same rows. Empty bounds and an
    /// empty search text are treated as absent.
    pub fn run(&self, table: &TableName, filter: QueryFilter) -> Result<Option<Vec<LogRow>>> {
        let filter = self.normalize_bounds(filter);
        tracing::debug!(table = %table, ?filter, "query");
        Ok(self.db.query(table, &filter)?)
    }

    fn normalize_bounds(&self, mut filter: QueryFilter) -> QueryFilter {
        let basis = self.time_basis;
        let bound = |t: Option<String>| {
            t.filter(|t| !t.trim().is_empty())
                .map(|t| normalize_with(t.trim(), basis))
        };
        filter.start_time = bound(filter.start_time);
        filter.end_time = bound(filter.end_time);
        filter.search_text = filter.search_text.filter(|s| !s.is_empty());
        filter
    }
}
