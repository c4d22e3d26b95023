use crate::types::{LogLevel, OutputFormat, SortArg};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "logtable")]
#[command(about = "Ingest large log files into queryable per-session tables", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Data directory (default: $LOGTABLE_PATH, then the platform data dir)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    /// Overridden by RUST_LOG when set
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Ingest a log file into a new session table")]
    Ingest(IngestArgs),

    #[command(about = "Query one session table")]
    Query(QueryArgs),

    #[command(about = "List registered sessions with their row counts")]
    List,

    #[command(about = "Drop one session table and its registry entry")]
    Delete { table: String },

    #[command(about = "Drop every registered session table")]
    Clear,

    #[command(about = "Remove registry entries whose table no longer exists")]
    Prune,

    #[command(about = "Reclaim free space in the database file")]
    Vacuum,

    #[command(about = "Show or initialize config.toml")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Args, Debug, Clone)]
pub struct IngestArgs {
    pub file: PathBuf,

    /// Lines per read window
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Rows per INSERT statement
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Roll back a whole chunk when any of its batches fails
    #[arg(long)]
    pub atomic_chunks: bool,

    /// JSON file with {"pattern": ..., "fields": [...]}
    #[arg(long)]
    pub strategy: Option<PathBuf>,

    /// Stop at the next chunk boundary after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    pub table: String,

    /// Inclusive lower bound (ISO-8601 or YYYY-MM-DD HH:MM:SS.mmm)
    #[arg(long)]
    pub start: Option<String>,

    /// Inclusive upper bound
    #[arg(long)]
    pub end: Option<String>,

    /// Case-sensitive substring of the record text
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long)]
    pub sort: Option<SortArg>,

    #[arg(long)]
    pub limit: Option<usize>,

    #[arg(long)]
    pub offset: Option<usize>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    #[command(about = "Print the effective configuration")]
    Show,

    #[command(about = "Write a config.toml with default values")]
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "logtable",
            "query",
            "log_a",
            "--sort",
            "desc",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Query(args) => assert_eq!(args.sort, Some(SortArg::Descend)),
            _ => panic!("expected query"),
        }
    }
}
