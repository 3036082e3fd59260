//! CLI argument parsing and command execution for pdfweave.
//!
//! This module defines the command-line interface structure using `clap`
//! and implements the two subcommands, `merge` and `analyze`.
//!
//! # Examples
//!
//! ```no_run
//! use pdfweave::cli::Cli;
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::error::{PdfWeaveError, Result};
use crate::merge::MergeReport;
use crate::output::OutputFormatter;
use crate::script::parse_script;
use crate::{inspect, merge, utils};

/// Assemble one PDF from many using a small merge command script.
///
/// A script is a sequence of `<file>:<range>` lines, where `<file>` is a
/// 1-based index into the input files and `<range>` is `all` or a
/// comma-separated list of pages and spans like `1,3-5`. Option lines
/// `--keep-bookmarks` and `--print` may appear anywhere in the script.
#[derive(Parser, Debug)]
#[command(name = "pdfweave")]
#[command(version)]
#[command(about = "Assemble one PDF from many using a merge command script", long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Merge input PDFs according to a command script
    Merge(MergeArgs),
    /// Report page count, bookmarks, and encryption for a PDF
    Analyze(AnalyzeArgs),
}

/// Arguments for the `merge` subcommand.
#[derive(clap::Args, Debug)]
pub struct MergeArgs {
    /// Input PDF files (in order)
    ///
    /// Specify multiple files or use glob patterns. The order here is
    /// the order the script's file indices refer to: the first input is
    /// file 1.
    ///
    /// Examples:
    ///   pdfweave merge a.pdf b.pdf -o out.pdf
    ///   pdfweave merge 'chapter*.pdf' -o book.pdf
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Output PDF file path
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Read the merge script from a file
    ///
    /// Without --script or --commands, every input contributes all of
    /// its pages in order.
    #[arg(short, long, value_name = "FILE", conflicts_with = "commands")]
    pub script: Option<PathBuf>,

    /// Give the merge script inline
    ///
    /// Example:
    ///   pdfweave merge a.pdf b.pdf -o out.pdf --commands $'1:all\n2:1-3'
    #[arg(short, long, value_name = "TEXT")]
    pub commands: Option<String>,

    /// Carry source bookmarks into the output
    ///
    /// Equivalent to a `--keep-bookmarks` line in the script. Each
    /// source with bookmarks gets a top-level "File N" marker, with its
    /// own entries nested one level below.
    #[arg(short = 'k', long)]
    pub keep_bookmarks: bool,

    /// Trim trailing blank pages from the output
    ///
    /// Equivalent to a `--print` line in the script.
    #[arg(short = 'p', long = "print")]
    pub print_mode: bool,

    /// Overwrite the output file if it exists
    #[arg(short, long)]
    pub force: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show detailed merge statistics
    #[arg(short, long)]
    pub verbose: bool,
}

/// Arguments for the `analyze` subcommand.
#[derive(clap::Args, Debug)]
pub struct AnalyzeArgs {
    /// PDF file to analyze
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Execute a parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Merge(args) => run_merge(args).await,
        Command::Analyze(args) => run_analyze(args).await,
    }
}

/// Run the `merge` subcommand.
async fn run_merge(args: MergeArgs) -> Result<()> {
    let formatter = OutputFormatter::new(args.quiet, args.verbose);

    let paths = utils::collect_paths_for_patterns(&args.inputs)?;
    if paths.is_empty() {
        return Err(PdfWeaveError::NoInputFiles);
    }

    if args.output.exists() && !args.force {
        return Err(PdfWeaveError::OutputExists {
            path: args.output.clone(),
        });
    }

    let script_text = assemble_script(&args, paths.len()).await?;
    let script = parse_script(&script_text, paths.len())?;

    formatter.info(&format!("Reading {} input file(s)...", paths.len()));
    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        formatter.debug(&format!("  {}", path.display()));
        files.push(tokio::fs::read(path).await?);
    }

    formatter.info("Merging documents...");
    let report = merge::merge_with_report(&files, &script)?;

    tokio::fs::write(&args.output, &report.bytes).await?;

    if formatter.should_print() {
        display_merge_report(&formatter, &report, &args.output);
    }

    Ok(())
}

/// Build the script text for a merge invocation.
///
/// CLI flags become option lines ahead of the script body. Without a
/// script body, every input contributes all pages in order.
async fn assemble_script(args: &MergeArgs, file_count: usize) -> Result<String> {
    let mut text = String::new();
    if args.keep_bookmarks {
        text.push_str("--keep-bookmarks\n");
    }
    if args.print_mode {
        text.push_str("--print\n");
    }

    match (&args.script, &args.commands) {
        (Some(path), _) => text.push_str(&tokio::fs::read_to_string(path).await?),
        (None, Some(commands)) => text.push_str(commands),
        (None, None) => {
            for index in 1..=file_count {
                text.push_str(&format!("{index}:all\n"));
            }
        }
    }

    Ok(text)
}

/// Print the post-merge summary.
fn display_merge_report(formatter: &OutputFormatter, report: &MergeReport, output: &PathBuf) {
    let stats = &report.statistics;

    formatter.success(&format!(
        "Wrote {} page(s) to {} in {:.2}s",
        stats.pages_written - stats.pages_trimmed,
        output.display(),
        stats.merge_time.as_secs_f64()
    ));

    if formatter.is_verbose() {
        formatter.section("Statistics");
        formatter.detail("Input files", &stats.files_opened.to_string());
        formatter.detail("Commands applied", &stats.commands_applied.to_string());
        formatter.detail("Pages written", &stats.pages_written.to_string());
        formatter.detail("Bookmarks added", &stats.bookmarks_added.to_string());
        formatter.detail("Pages trimmed", &stats.pages_trimmed.to_string());
        formatter.detail("Output size", &format!("{} bytes", report.bytes.len()));
    }
}

/// Run the `analyze` subcommand.
async fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let bytes = tokio::fs::read(&args.file).await?;
    let result = inspect::analyze(&bytes)?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&result)
    } else {
        serde_json::to_string(&result)
    }
    .map_err(|e| PdfWeaveError::engine_failure(format!("failed to encode result: {e}")))?;

    println!("{json}");
    Ok(())
}
