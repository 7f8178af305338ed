//! `boreal goto-def <file> <line> <col>` — a thin, humanly-inspectable
//! harness over `boreal_sem::find_definition`, printed as JSON so it can
//! double as a golden-file fixture source for tests.

use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

use crate::error::{DrvError, Result};

#[derive(Debug, Clone)]
pub struct GotoDefArgs {
    pub file: PathBuf,
    pub line: u32,
    pub column: u32,
}

#[derive(Serialize)]
struct GotoDefReport {
    found: bool,
    line: Option<u32>,
    column: Option<u32>,
    position: Option<usize>,
}

pub fn run_goto_def(args: GotoDefArgs) -> Result<bool> {
    if args.line == 0 {
        return Err(DrvError::InvalidPosition);
    }

    debug!(file = %args.file.display(), line = args.line, column = args.column, "resolving definition");
    let source = std::fs::read_to_string(&args.file).map_err(|e| DrvError::Io(args.file.clone(), e))?;

    let definition = boreal_sem::find_definition(&source, args.line, args.column);
    let report = match definition {
        Some(span) => GotoDefReport {
            found: true,
            line: Some(span.line),
            column: Some(span.column),
            position: Some(span.start),
        },
        None => GotoDefReport {
            found: false,
            line: None,
            column: None,
            position: None,
        },
    };

    println!("{}", serde_json::to_string(&report)?);
    Ok(definition.is_some())
}
