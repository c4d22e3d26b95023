use logtable_types::{LogRecord, LogRow, QueryFilter, RegistryEntry, TableName};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::queries::session_table::{Atomicity, LoadReport};
use crate::queries::{registry, session_table};
use crate::records::{Provisioned, TableStatus};
use crate::schema;
use crate::{Error, Result};

pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Process-wide storage handle.
///
/// The connection sits behind a mutex, so DDL, bulk inserts and queries from
/// different threads are serialized. Share it with `Arc<Database>`.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(db_path: &Path) -> Result<Self> {
        Self::open_with_timeout(db_path, DEFAULT_BUSY_TIMEOUT)
    }

    /// Open with an explicit bound on how long a statement waits for a lock
    /// held by another process.
    pub fn open_with_timeout(db_path: &Path, busy_timeout: Duration) -> Result<Self> {
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        conn.busy_timeout(busy_timeout)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        schema::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| Error::Poisoned)
    }

    // Registry

    pub fn register(&self, table: &TableName) -> Result<bool> {
        registry::insert(&*self.lock()?, table)
    }

    pub fn list_registry(&self) -> Result<Vec<RegistryEntry>> {
        registry::list(&*self.lock()?)
    }

    pub fn get_registry_entry(&self, table_name: &str) -> Result<Option<RegistryEntry>> {
        registry::get(&*self.lock()?, table_name)
    }

    pub fn unregister_id(&self, id: i64) -> Result<usize> {
        registry::remove_by_id(&*self.lock()?, id)
    }

    pub fn unregister(&self, table_name: &str) -> Result<usize> {
        registry::remove_by_name(&*self.lock()?, table_name)
    }

    // Session tables

    pub fn table_exists(&self, table: &TableName) -> Result<bool> {
        session_table::exists(&*self.lock()?, table)
    }

    pub fn create_session_table(&self, table: &TableName) -> Result<bool> {
        session_table::create(&*self.lock()?, table)
    }

    pub fn drop_session_table(&self, table: &TableName) -> Result<bool> {
        session_table::drop_table(&*self.lock()?, table)
    }

    /// Register `table`, then create it.
    ///
    /// The order matters: a crash between the two steps leaves a registry
    /// entry without a table, which cleanup resolves. The reverse order
    /// would leave a table nothing can enumerate.
    pub fn provision(&self, table: &TableName) -> Result<Provisioned> {
        let conn = self.lock()?;
        let registered = registry::insert(&conn, table)?;
        let created = session_table::create(&conn, table)?;
        Ok(Provisioned {
            table: table.clone(),
            registered,
            created,
        })
    }

    pub fn insert_records(
        &self,
        table: &TableName,
        records: &[LogRecord],
        batch_size: usize,
        atomicity: Atomicity,
    ) -> Result<LoadReport> {
        let mut conn = self.lock()?;
        session_table::insert_records(&mut conn, table, records, batch_size, atomicity)
    }

    /// Query a session table; `None` when the table does not exist.
    pub fn query(&self, table: &TableName, filter: &QueryFilter) -> Result<Option<Vec<LogRow>>> {
        let conn = self.lock()?;
        if !session_table::exists(&conn, table)? {
            return Ok(None);
        }
        session_table::query(&conn, table, filter).map(Some)
    }

    pub fn count_rows(&self, table: &TableName) -> Result<u64> {
        session_table::count(&*self.lock()?, table)
    }

    /// Registry entries with their physical state, in registration order.
    pub fn table_statuses(&self) -> Result<Vec<TableStatus>> {
        let conn = self.lock()?;
        let entries = registry::list(&conn)?;

        entries
            .into_iter()
            .map(|entry| {
                let (exists, rows) = match TableName::parse(&entry.table_name) {
                    Ok(table) if session_table::exists(&conn, &table)? => {
                        (true, Some(session_table::count(&conn, &table)?))
                    }
                    _ => (false, None),
                };
                Ok(TableStatus {
                    entry,
                    exists,
                    rows,
                })
            })
            .collect()
    }

    pub fn vacuum(&self) -> Result<()> {
        self.lock()?.execute("VACUUM", [])?;
        Ok(())
    }

    /// Run `f` against the raw connection while holding the lock.
    pub fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        f(&*self.lock()?)
    }
}
