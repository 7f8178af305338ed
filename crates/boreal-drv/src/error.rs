//! Error handling for the `boreal` CLI.
//!
//! Distinct from the `Diagnostic`s `boreal-sem` collects about an analysed
//! source file: these are failures of the CLI invocation itself (a missing
//! file, a malformed `--line`/`--column`), reported with `thiserror` and
//! propagated with `?` the way the analysis crates report their own
//! caller-facing failures.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DrvError {
    #[error("failed to read {0}: {1}")]
    Io(std::path::PathBuf, #[source] std::io::Error),

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("line and column must be at least 1")]
    InvalidPosition,
}

pub type Result<T> = std::result::Result<T, DrvError>;
