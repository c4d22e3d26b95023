use logtable_types::{RegistryEntry, TableName};
use serde::Serialize;

/// Result of provisioning a session table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provisioned {
    pub table: TableName,
    /// False when the registry already held this name.
    pub registered: bool,
    /// False when the table already existed.
    pub created: bool,
}

/// A registry entry joined with the physical state of its table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableStatus {
    #[serde(flatten)]
    pub entry: RegistryEntry,
    /// Whether the table is present in the database.
    pub exists: bool,
    /// Live (not soft-deleted) rows; `None` when the table is missing.
    pub rows: Option<u64>,
}

impl TableStatus {
    /// Registered but never created, or dropped out from under the registry.
    pub fn is_orphan(&self) -> bool {
        !self.exists
    }
}
