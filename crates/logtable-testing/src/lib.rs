//! Testing infrastructure for logtable integration tests.
//!
//! This crate provides utilities for writing robust integration tests:
//! - `TestWorld`: isolated data directory plus CLI execution
//! - `assertions`: checks over the JSON `Reply` envelope
//! - `fixtures`: generated log files with multi-line records

pub mod assertions;
pub mod fixtures;
pub mod world;

pub use fixtures::LogBuilder;
pub use world::{CliResult, TestWorld};
