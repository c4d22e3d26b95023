// NOTE: logtable layout
//
// - logtable-engine turns lines into records; it knows nothing about files
//   or storage.
// - logtable-index owns SQLite: the log_history registry and one table per
//   ingestion session.
// - logtable-runtime drives the chunked read -> parse -> load loop and the
//   registry-driven cleanup.
// - This crate only parses arguments, wires Ctrl-C and progress, and renders
//   replies.

mod args;
mod commands;
pub mod context;
mod handlers;
mod logging;
mod output;
pub mod types;

pub use args::{Cli, Commands, ConfigCommand, IngestArgs, QueryArgs};
pub use commands::run;
