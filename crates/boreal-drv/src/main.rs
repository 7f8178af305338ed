//! `boreal` - a small CLI front end over the Boreal analysis pipeline.
//!
//! Two subcommands mirror Boreal's two external entry points:
//!
//!   boreal analyze <file>
//!   boreal goto-def <file> <line> <col>

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use boreal_drv::commands::analyze::{run_analyze, AnalyzeArgs};
use boreal_drv::commands::goto_def::{run_goto_def, GotoDefArgs};

/// Boreal - a static analysis core for the Boreal teaching language.
#[derive(Parser, Debug)]
#[command(name = "boreal")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Lex, parse, and semantically analyze Boreal source", long_about = None)]
struct Cli {
    /// Enable verbose (debug-level) logging
    #[arg(short, long, global = true, env = "BOREAL_VERBOSE")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the full pipeline and print diagnostics, symbols, and semantic
    /// tokens as JSON
    Analyze(AnalyzeCommand),

    /// Resolve the identifier at a source position back to its declaration
    GotoDef(GotoDefCommand),
}

#[derive(Parser, Debug)]
struct AnalyzeCommand {
    /// Path to the Boreal source file
    file: PathBuf,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

#[derive(Parser, Debug)]
struct GotoDefCommand {
    /// Path to the Boreal source file
    file: PathBuf,

    /// 1-based line of the query position
    line: u32,

    /// 0-based column of the query position
    column: u32,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let outcome = match cli.command {
        Commands::Analyze(args) => run_analyze(AnalyzeArgs {
            file: args.file,
            pretty: args.pretty,
        }),
        Commands::GotoDef(args) => run_goto_def(GotoDefArgs {
            file: args.file,
            line: args.line,
            column: args.column,
        }),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose { EnvFilter::new("debug") } else { EnvFilter::new("info") };
    let subscriber = fmt::layer().with_target(false).with_thread_ids(false).with_thread_names(false);
    let _ = tracing_subscriber::registry().with(filter).with(subscriber).try_init();
}
