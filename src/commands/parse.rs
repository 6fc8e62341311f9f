//! Parse command: run the parsers on previously captured tool output.
//!
//! Handy when the tools ran elsewhere (CI, another machine) and only their
//! logs were kept.

use super::models::{OutputFormat, ParseArgs};
use crate::aggregator::{inspect_raw_report, InspectionResult};
use crate::parser::RawReport;
use crate::utils::error::InspectError;
use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::Path;

/// Execute the parse command
///
/// **Public** - main entry point called from main.rs
pub fn execute_parse(args: ParseArgs) -> Result<InspectionResult> {
    let result = parse_files(&args)?;

    match args.format {
        OutputFormat::Text => println!("{}", result.render_text()),
        OutputFormat::Csv => println!("{}", result.render_csv()),
    }

    Ok(result)
}

/// Read both capture files and aggregate them without printing
///
/// # Arguments
/// * `args` - Paths of the saved drrun stdout and valgrind stderr
///
/// # Returns
/// The aggregated result, exactly as `inspect` would have produced it
///
/// # Errors
/// Fails if either file cannot be read, or with an `InspectError::Parse`
/// in the chain if either log is malformed.
pub fn parse_files(args: &ParseArgs) -> Result<InspectionResult> {
    info!(
        "Parsing {} and {}",
        args.stack_output.display(),
        args.heap_output.display()
    );

    let stack_output = read_capture(&args.stack_output)?;
    let heap_output = read_capture(&args.heap_output)?;

    let raw = RawReport::new(stack_output, heap_output);
    let result = inspect_raw_report(&raw)
        .map_err(InspectError::from)
        .context("Failed to parse captured tool output")?;

    Ok(result)
}

/// Load a capture file; the traced program may have written arbitrary bytes
fn read_capture(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
