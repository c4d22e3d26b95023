use crate::{Error, Result};
use logtable_engine::ParserConfig;
use logtable_index::Atomicity;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CHUNK_SIZE: usize = 5000;
pub const DEFAULT_BATCH_SIZE: usize = 500;
pub const DEFAULT_PROGRESS_CAPACITY: usize = 16;
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// Rows per INSERT statement are bounded by SQLite's host parameter limit
/// (two parameters per row).
pub const MAX_BATCH_SIZE: usize = 10_000;

/// Resolve the workspace data directory path based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. LOGTABLE_PATH environment variable (with tilde expansion)
/// 3. XDG data directory (recommended default)
/// 4. ~/.logtable (fallback for systems without XDG)
pub fn resolve_workspace_path(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var("LOGTABLE_PATH") {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(data_dir) = dirs::data_dir() {
        return Ok(data_dir.join("logtable"));
    }

    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".logtable"));
    }

    Err(Error::Config(
        "Could not determine workspace path: no HOME directory or XDG data directory found"
            .to_string(),
    ))
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Lines per read window.
    pub chunk_size: usize,
    /// Rows per INSERT statement.
    pub batch_size: usize,
    pub atomicity: Atomicity,
    /// Progress events buffered before the pipeline blocks on a slow consumer.
    pub progress_capacity: usize,
    /// Stop at the next chunk boundary once this many seconds have passed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
            atomicity: Atomicity::default(),
            progress_capacity: DEFAULT_PROGRESS_CAPACITY,
            timeout_secs: None,
        }
    }
}

impl IngestConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub busy_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl StorageConfig {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let ingest = &self.ingest;
        if ingest.chunk_size == 0 {
            return Err(Error::Config("ingest.chunk_size must be at least 1".into()));
        }
        if ingest.batch_size == 0 || ingest.batch_size > MAX_BATCH_SIZE {
            return Err(Error::Config(format!(
                "ingest.batch_size must be between 1 and {}",
                MAX_BATCH_SIZE
            )));
        }
        if ingest.progress_capacity == 0 {
            return Err(Error::Config(
                "ingest.progress_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logtable_engine::TimeBasis;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.ingest.chunk_size, 5000);
        assert_eq!(config.ingest.batch_size, 500);
        assert_eq!(config.ingest.atomicity, Atomicity::PerBatch);
        assert!(config.parser.pattern.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.ingest.chunk_size = 100;
        config.ingest.atomicity = Atomicity::PerChunk;
        config.ingest.timeout_secs = Some(30);
        config.parser.time_basis = TimeBasis::Utc;
        config.save_to(&config_path)?;

        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded, config);
        assert_eq!(loaded.ingest.timeout(), Some(Duration::from_secs(30)));

        Ok(())
    }

    #[test]
    fn test_missing_file_yields_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let loaded = Config::load_from(&temp_dir.path().join("absent.toml"))?;
        assert_eq!(loaded, Config::default());
        Ok(())
    }

    #[test]
    fn test_partial_file_fills_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            "[ingest]\nbatch_size = 50\natomicity = \"per_chunk\"\n",
        )?;

        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded.ingest.batch_size, 50);
        assert_eq!(loaded.ingest.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(loaded.ingest.atomicity, Atomicity::PerChunk);
        assert_eq!(loaded.storage.busy_timeout_ms, DEFAULT_BUSY_TIMEOUT_MS);
        Ok(())
    }

    #[test]
    fn test_invalid_sizes_are_rejected() {
        let mut config = Config::default();
        config.ingest.batch_size = MAX_BATCH_SIZE + 1;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = Config::default();
        config.ingest.chunk_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_tilde("~/logs");
        if let Some(home) = std::env::var_os("HOME") {
            assert_eq!(expanded, PathBuf::from(home).join("logs"));
        }
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
    }

    #[test]
    fn test_explicit_path_wins() {
        let path = resolve_workspace_path(Some("/tmp/explicit")).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/explicit"));
    }
}
