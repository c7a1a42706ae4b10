//! # Validate Command
//!
//! Validates one manifest file and prints its report.
//!
//! Exit codes: 0 when the report is empty, 1 when it has diagnostics
//! (including unreadable or malformed input), 2 when the file does not
//! exist.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use podlint_core::Report;
use podlint_schema::validate_file;

use crate::config::{CliConfig, OutputFormat, PathDisplay};

/// Arguments for validating a manifest.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the Pod manifest (YAML).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output format. Overrides the config file.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Show the path as given instead of the bare file name.
    #[arg(long)]
    pub full_path: bool,
}

/// Execute validation for `args`.
///
/// Returns the process exit code.
pub fn run_validate(args: &ValidateArgs, config: &CliConfig) -> Result<u8> {
    if !args.file.exists() {
        eprintln!("ERROR: {} does not exist", args.file.display());
        return Ok(2);
    }

    let path_display = if args.full_path {
        PathDisplay::AsGiven
    } else {
        config.path_display
    };
    let format = args.format.unwrap_or(config.format);
    let source = display_name(&args.file, path_display);

    tracing::info!(file = %args.file.display(), %source, ?format, "validating manifest");

    let report = validate_file(&args.file, &source);
    let output = render(&report, format).context("failed to render report")?;
    if !output.is_empty() {
        println!("{output}");
    }

    tracing::info!(diagnostics = report.len(), "done");
    Ok(if report.is_valid() { 0 } else { 1 })
}

/// Name used for `path` inside diagnostics.
pub fn display_name(path: &Path, mode: PathDisplay) -> String {
    match mode {
        PathDisplay::AsGiven => path.display().to_string(),
        PathDisplay::FileName => path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
    }
}

/// Render a report in the requested format. Text output of a valid report
/// is empty.
pub fn render(report: &Report, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(report.to_string()),
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).context("failed to serialize diagnostics")
        }
    }
}
