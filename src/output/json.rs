//! JSON report writer.
//!
//! Writes InspectionReport structs to JSON files with proper formatting.

use crate::aggregator::InspectionResult;
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Top-level document written by `inspect --json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Executable that was inspected
    pub executable: String,

    /// Timestamp when the report was generated
    pub generated_at: String,

    /// Wall-clock time spent running both tools
    pub elapsed_secs: f64,

    pub result: InspectionResult,
}

impl InspectionReport {
    /// Wrap a result with the current schema version and timestamp
    pub fn new(executable: impl Into<String>, elapsed_secs: f64, result: InspectionResult) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            executable: executable.into(),
            generated_at: Utc::now().to_rfc3339(),
            elapsed_secs,
            result,
        }
    }
}

/// Write a report to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `report` - Report to serialize
/// * `output_path` - Path to output file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
///
/// # Example
/// ```ignore
/// let report = InspectionReport::new("./test_vector", elapsed, result);
/// write_report(&report, "report.json")?;
/// ```
pub fn write_report(report: &InspectionReport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());

    prepare_output_path(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, report).map_err(OutputError::SerializationFailed)?;

    debug!("Report written ({} bytes)", calculate_file_size(output_path));

    Ok(())
}

/// Read a report back from a JSON file
///
/// **Public** - useful for validation and testing
///
/// Derived fields of the embedded result are recomputed from its counters.
pub fn read_report(input_path: impl AsRef<Path>) -> Result<InspectionReport, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading report from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let report: InspectionReport =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!("Report loaded: version {}, executable {}", report.version, report.executable);

    Ok(report)
}

/// Validate an output path and create its parent directories
///
/// **Public** - shared with the CSV writer
pub fn prepare_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}

fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
