//! TestWorld pattern for declarative integration test setup.
//!
//! Provides a fluent interface for:
//! - Creating isolated data directories
//! - Writing log files to ingest
//! - Executing CLI commands against that data directory

use anyhow::Result;
use assert_cmd::Command;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::fixtures::{LogBuilder, write_log};

/// Declarative test environment builder.
///
/// # Example
/// ```no_run
/// use logtable_testing::{LogBuilder, TestWorld};
///
/// let world = TestWorld::new().with_log("app.log", &LogBuilder::new(5).build());
///
/// let result = world.run(&["ingest", "app.log"]).unwrap();
/// assert!(result.success());
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    data_dir: PathBuf,
    logs_dir: PathBuf,
    env_vars: HashMap<String, String>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    /// Create a new isolated test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join(".logtable");
        let logs_dir = temp_dir.path().join("logs");

        std::fs::create_dir_all(&logs_dir).expect("Failed to create logs dir");

        Self {
            temp_dir,
            data_dir,
            logs_dir,
            env_vars: HashMap::new(),
        }
    }

    /// Get the data directory path (.logtable). Created lazily by the CLI.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Directory log files are written to; also the command's cwd.
    pub fn logs_dir(&self) -> &Path {
        &self.logs_dir
    }

    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Set an environment variable for CLI execution.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Write a log file under the logs directory.
    pub fn with_log(self, name: &str, content: &str) -> Self {
        write_log(&self.logs_dir.join(name), content).expect("Failed to write log");
        self
    }

    pub fn with_generated_log(self, name: &str, builder: &LogBuilder) -> Self {
        let content = builder.build();
        self.with_log(name, &content)
    }

    pub fn log_path(&self, name: &str) -> PathBuf {
        self.logs_dir.join(name)
    }

    /// Write `config.toml` into the data directory.
    pub fn with_config(self, toml: &str) -> Self {
        write_log(&self.data_dir.join("config.toml"), toml).expect("Failed to write config");
        self
    }

    /// Configure a CLI command with this test environment's settings.
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.arg("--data-dir").arg(self.data_dir());

        cmd.current_dir(&self.logs_dir);
        cmd.env_remove("LOGTABLE_PATH");
        cmd.env_remove("RUST_LOG");

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }

    /// Execute the `logtable` binary with `args` and capture its output.
    ///
    /// # Note
    /// This method uses `Command::cargo_bin()` which requires the binary to be
    /// built (cargo test does this for the package that owns it).
    #[allow(deprecated)]
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        let mut cmd = Command::cargo_bin("logtable")
            .map_err(|e| anyhow::anyhow!("Failed to find logtable binary: {}", e))?;

        self.configure_command(&mut cmd);
        cmd.args(args);

        let output = cmd.output()?;

        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    /// Run with `--format json` and parse stdout.
    pub fn run_json(&self, args: &[&str]) -> Result<(CliResult, serde_json::Value)> {
        let mut full = vec!["--format", "json"];
        full.extend_from_slice(args);
        let result = self.run(&full)?;
        let json = result.json()?;
        Ok((result, json))
    }
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    /// Check if the command succeeded.
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Parse stdout as JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.stdout)?)
    }

    /// Get stdout as a string.
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Get stderr as a string.
    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}
