//! Subcommand implementations for the `boreal` CLI.

pub mod analyze;
pub mod goto_def;
pub mod report;
