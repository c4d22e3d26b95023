use crate::types::OutputFormat;
use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use logtable_runtime::config::Config;
use logtable_runtime::workspace::CONFIG_FILE;
use logtable_runtime::LogTable;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

/// Lazily opened state shared by the handlers of one invocation.
pub struct ExecutionContext {
    data_dir: PathBuf,
    pub format: OutputFormat,
    config: OnceCell<Config>,
    workspace: OnceCell<LogTable>,
}

impl ExecutionContext {
    pub fn new(data_dir: PathBuf, format: OutputFormat) -> Self {
        Self {
            data_dir,
            format,
            config: OnceCell::new(),
            workspace: OnceCell::new(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }

    pub fn config(&self) -> Result<&Config> {
        self.config.get_or_try_init(|| {
            let path = self.config_path();
            Config::load_from(&path).with_context(|| format!("loading {}", path.display()))
        })
    }

    /// Workspace opened with the file configuration as is.
    pub fn workspace(&self) -> Result<&LogTable> {
        self.workspace.get_or_try_init(|| {
            let config = self.config()?.clone();
            Ok(LogTable::open_with_config(self.data_dir.clone(), config)?)
        })
    }

    /// Workspace opened with `config` instead of the file configuration.
    pub fn workspace_with(&self, config: Config) -> Result<LogTable> {
        Ok(LogTable::open_with_config(self.data_dir.clone(), config)?)
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Colors only for plain output on a terminal.
    pub fn use_color(&self) -> bool {
        !self.is_json() && std::io::stdout().is_terminal()
    }
}
