//! Batch command implementation.
//!
//! Finds test executables under one or more directories, inspects each,
//! and writes a single CSV table. A failing executable is recorded with
//! its reason instead of aborting the batch.

use super::inspect::{inspect_target, validate_tools};
use super::models::BatchArgs;
use crate::launcher::Target;
use crate::output::{write_batch_csv, BatchRow};
use anyhow::{Context, Result};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// Execute the batch command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// All rows, in the order they were written
pub fn execute_batch(args: BatchArgs) -> Result<Vec<BatchRow>> {
    validate_tools(&args.tools)?;

    let executables = collect_executables(&args.directories, &args.name_filter);
    info!("Found {} executable(s) to inspect", executables.len());

    let rows: Vec<BatchRow> = executables
        .iter()
        .map(|exe| inspect_one(&args, exe))
        .collect();

    let failed = rows.iter().filter(|row| !row.succeeded()).count();
    if failed > 0 {
        warn!("{} of {} inspection(s) failed", failed, rows.len());
    }

    write_batch_csv(&rows, &args.output_csv).context("Failed to write batch CSV")?;
    info!("✓ Batch results written to: {}", args.output_csv.display());

    Ok(rows)
}

/// Recursively collect candidate executables
///
/// **Public** - exposed for testing
///
/// A candidate is a regular file whose name has no `.` (skips sources,
/// objects and scripts) and contains `name_filter`. Unreadable entries are
/// skipped with a warning. Results are sorted for a stable row order.
pub fn collect_executables(directories: &[PathBuf], name_filter: &str) -> Vec<PathBuf> {
    let mut found = Vec::new();

    for directory in directories {
        for entry in WalkDir::new(directory) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("Skipping path due to I/O error: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            if is_candidate(&entry.file_name().to_string_lossy(), name_filter) {
                found.push(entry.into_path());
            }
        }
    }

    found.sort();
    found
}

fn is_candidate(file_name: &str, name_filter: &str) -> bool {
    !file_name.contains('.') && file_name.contains(name_filter)
}

/// Inspect one executable and turn the outcome into a row
///
/// **Private** - internal helper for execute_batch
fn inspect_one(args: &BatchArgs, executable: &Path) -> BatchRow {
    info!("Inspecting: {}", executable.display());

    let start = Instant::now();
    let result = inspect_target(&args.tools, &Target::new(executable));
    let elapsed_secs = start.elapsed().as_secs_f64();

    let result = result.map_err(|e| {
        warn!("Inspection of {} failed: {}", executable.display(), e);
        first_line(&e.to_string())
    });

    BatchRow {
        executable: executable.display().to_string(),
        result,
        executable_size: std::fs::metadata(executable).map(|m| m.len()).unwrap_or(0),
        elapsed_secs,
    }
}

/// Error messages embed whole tool logs; keep only the first line
fn first_line(message: &str) -> String {
    message.lines().next().unwrap_or_default().to_string()
}
