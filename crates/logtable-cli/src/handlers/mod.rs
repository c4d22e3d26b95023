pub mod clear;
pub mod config;
pub mod delete;
pub mod ingest;
pub mod list;
pub mod prune;
pub mod query;
pub mod vacuum;
