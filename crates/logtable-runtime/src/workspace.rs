use logtable_index::Database;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::ops::{CleanupService, IngestOptions, IngestService, QueryService};
use crate::Result;

pub const DB_FILE: &str = "logtable.db";
pub const CONFIG_FILE: &str = "config.toml";

/// An opened data directory: the database plus its configuration.
pub struct LogTable {
    db: Arc<Database>,
    data_dir: PathBuf,
    config: Config,
}

impl LogTable {
    pub fn open(data_dir: PathBuf) -> Result<Self> {
        let config = Config::load_from(&data_dir.join(CONFIG_FILE))?;
        Self::open_with_config(data_dir, config)
    }

    /// Open with an already resolved configuration (e.g. file values with
    /// command line overrides applied).
    pub fn open_with_config(data_dir: PathBuf, config: Config) -> Result<Self> {
        config.validate()?;
        let db = Database::open_with_timeout(
            &data_dir.join(DB_FILE),
            config.storage.busy_timeout(),
        )?;

        Ok(Self {
            db: Arc::new(db),
            data_dir,
            config,
        })
    }

    pub fn ingest(&self) -> IngestService<'_> {
        IngestService::new(&self.db, IngestOptions::from(&self.config))
    }

    pub fn ingest_with(&self, options: IngestOptions) -> IngestService<'_> {
        IngestService::new(&self.db, options)
    }

    pub fn cleanup(&self) -> CleanupService<'_> {
        CleanupService::new(&self.db)
    }

    pub fn query(&self) -> QueryService<'_> {
        QueryService::new(&self.db, self.config.parser.time_basis)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Shared handle for work on other threads.
    pub fn shared_database(&self) -> Arc<Database> {
        self.db.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }
}
