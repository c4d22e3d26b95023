use logtable_index::{Database, TableStatus};
use logtable_types::{RegistryEntry, TableName};
use serde::Serialize;

use crate::Result;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ClearReport {
    /// Registry entries processed, in registration order.
    pub entries: Vec<RegistryEntry>,
    pub tables_dropped: usize,
    /// Entries whose table was already gone.
    pub orphans: usize,
}

impl ClearReport {
    pub fn message(&self) -> String {
        if self.entries.is_empty() {
            return "No sessions to clear".to_string();
        }
        format!(
            "Cleared {} sessions ({} tables dropped, {} orphaned entries removed)",
            self.entries.len(),
            self.tables_dropped,
            self.orphans
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub dropped: bool,
    pub unregistered: bool,
}

impl DeleteOutcome {
    pub fn found(&self) -> bool {
        self.dropped || self.unregistered
    }
}

/// Registry-driven cleanup. Session tables are only ever enumerated through
/// the registry.
pub struct CleanupService<'a> {
    db: &'a Database,
}

impl<'a> CleanupService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Drop every registered table that exists and remove every entry.
    /// Running it twice processes nothing the second time.
    pub fn clear_all(&self) -> Result<ClearReport> {
        let entries = self.db.list_registry()?;
        let mut report = ClearReport::default();

        for entry in &entries {
            match TableName::parse(&entry.table_name) {
                Ok(table) => {
                    if self.db.drop_session_table(&table)? {
                        report.tables_dropped += 1;
                    } else {
                        report.orphans += 1;
                        tracing::debug!(table = %table, "orphaned registry entry");
                    }
                }
                Err(err) => {
                    // Never touch a table we did not name; just forget the entry
                    report.orphans += 1;
                    tracing::warn!(id = entry.id, "{}", err);
                }
            }
            self.db.unregister_id(entry.id)?;
        }

        report.entries = entries;
        tracing::info!(
            entries = report.entries.len(),
            dropped = report.tables_dropped,
            "registry cleared"
        );
        Ok(report)
    }

    /// Drop one session table (if present) and remove its entry (if any).
    pub fn delete_one(&self, table: &TableName) -> Result<DeleteOutcome> {
        let dropped = self.db.drop_session_table(table)?;
        let unregistered = self.db.unregister(table.as_str())? > 0;

        if unregistered && !dropped {
            tracing::debug!(table = %table, "removed orphaned registry entry");
        }
        Ok(DeleteOutcome {
            dropped,
            unregistered,
        })
    }

    pub fn list(&self) -> Result<Vec<TableStatus>> {
        Ok(self.db.table_statuses()?)
    }

    /// Remove registry entries whose table does not exist. Drops nothing.
    pub fn prune(&self) -> Result<Vec<RegistryEntry>> {
        let mut pruned = Vec::new();
        for status in self.db.table_statuses()? {
            if status.is_orphan() {
                self.db.unregister_id(status.entry.id)?;
                tracing::debug!(table = %status.entry.table_name, "pruned orphaned entry");
                pruned.push(status.entry);
            }
        }
        Ok(pruned)
    }

    pub fn vacuum(&self) -> Result<()> {
        Ok(self.db.vacuum()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logtable_index::Atomicity;
    use logtable_types::LogRecord;

    fn table(name: &str) -> TableName {
        TableName::parse(name).unwrap()
    }

    fn seeded() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.provision(&table("log_one")).unwrap();
        db.provision(&table("log_two")).unwrap();
        db.insert_records(
            &table("log_two"),
            &[LogRecord::new("2024-01-01 00:00:00.000", "x")],
            10,
            Atomicity::PerBatch,
        )
        .unwrap();
        db.register(&table("log_orphan")).unwrap();
        db
    }

    #[test]
    fn test_clear_all_is_idempotent() {
        let db = seeded();
        let service = CleanupService::new(&db);

        let first = service.clear_all().unwrap();
        assert_eq!(first.entries.len(), 3);
        assert_eq!(first.tables_dropped, 2);
        assert_eq!(first.orphans, 1);
        assert!(!db.table_exists(&table("log_two")).unwrap());

        let second = service.clear_all().unwrap();
        assert!(second.entries.is_empty());
        assert_eq!(second.message(), "No sessions to clear");
    }

    #[test]
    fn test_delete_orphaned_entry() {
        let db = seeded();
        let outcome = CleanupService::new(&db)
            .delete_one(&table("log_orphan"))
            .unwrap();

        assert!(!outcome.dropped);
        assert!(outcome.unregistered);
        assert!(db.get_registry_entry("log_orphan").unwrap().is_none());
    }

    #[test]
    fn test_delete_unknown_table_finds_nothing() {
        let db = seeded();
        let outcome = CleanupService::new(&db)
            .delete_one(&table("log_unknown"))
            .unwrap();
        assert!(!outcome.found());
        assert_eq!(db.list_registry().unwrap().len(), 3);
    }

    #[test]
    fn test_prune_keeps_live_tables() {
        let db = seeded();
        let service = CleanupService::new(&db);

        let pruned = service.prune().unwrap();
        assert_eq!(pruned.len(), 1);
        assert_eq!(pruned[0].table_name, "log_orphan");

        let remaining = service.list().unwrap();
        assert_eq!(remaining.len(), 2);
        assert!(remaining.iter().all(|s| s.exists));
        assert_eq!(remaining[1].rows, Some(1));
    }
}
