//! `boreal analyze <file>` — runs the full pipeline once and prints its
//! diagnostics, resolved symbol table, and semantic-token stream as JSON.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::commands::report::AnalysisReport;
use crate::error::{DrvError, Result};

#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    pub file: PathBuf,
    pub pretty: bool,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<bool> {
    debug!(file = %args.file.display(), "reading source");
    let source = std::fs::read_to_string(&args.file).map_err(|e| DrvError::Io(args.file.clone(), e))?;

    info!(file = %args.file.display(), "analyzing");
    let result = boreal_sem::analyze(&source);
    let has_errors = result.has_errors();
    let report = AnalysisReport::from(&result);

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");

    Ok(!has_errors)
}
