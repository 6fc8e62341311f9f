//! Batch CSV writer.
//!
//! One row per inspected executable. Failed inspections keep their row so
//! the table still accounts for every binary that was found. `AVERAGE` and
//! `SUM` rows over the successful executables close the table.

use super::json::prepare_output_path;
use crate::aggregator::InspectionResult;
use crate::utils::config::CSV_HEADER;
use crate::utils::error::OutputError;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Outcome of inspecting one executable in a batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRow {
    pub executable: String,

    /// `Err` carries a one-line failure reason
    pub result: Result<InspectionResult, String>,

    pub executable_size: u64,
    pub elapsed_secs: f64,
}

impl BatchRow {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }

    /// Render the row; result columns are left empty on failure
    pub fn to_csv_line(&self) -> String {
        let (result_columns, status, reason) = match &self.result {
            Ok(result) => (result.render_csv(), "True", String::new()),
            Err(reason) => (vec![""; CSV_HEADER.len()].join(","), "False", reason.clone()),
        };

        format!(
            "{},{},{},{},{},{}",
            escape_field(&self.executable),
            result_columns,
            self.executable_size,
            self.elapsed_secs,
            status,
            escape_field(&reason)
        )
    }
}

/// Label of the per-column mean row
pub const AVERAGE_ROW: &str = "AVERAGE";

/// Label of the per-column sum row
pub const SUM_ROW: &str = "SUM";

/// Result columns plus size and elapsed time
const NUMERIC_COLUMNS: usize = CSV_HEADER.len() + 2;

impl BatchRow {
    /// Numeric columns of a successful row, in column order
    fn numeric_columns(&self) -> Option<[f64; NUMERIC_COLUMNS]> {
        let result = self.result.as_ref().ok()?;
        let stack = result.stack();
        let heap = result.heap();
        Some([
            stack.total_stack_allocs as f64,
            stack.run_count as f64,
            heap.total_heap_allocs as f64,
            heap.total_heap_frees as f64,
            heap.total_heap_bytes as f64,
            result.avg_alloc_size(),
            heap.run_count as f64,
            heap.error_count as f64,
            result.stack_fraction(),
            result.heap_fraction(),
            self.executable_size as f64,
            self.elapsed_secs,
        ])
    }
}

/// `AVERAGE` and `SUM` lines over the successful rows
///
/// **Public** - appended after the data rows by `write_batch_csv`
///
/// Failed rows are skipped entirely. With no successful rows the average
/// columns are left empty and the sums are zero.
pub fn summary_lines(rows: &[BatchRow]) -> [String; 2] {
    let mut sums = [0.0; NUMERIC_COLUMNS];
    let mut succeeded = 0usize;
    for values in rows.iter().filter_map(BatchRow::numeric_columns) {
        for (sum, value) in sums.iter_mut().zip(values) {
            *sum += value;
        }
        succeeded += 1;
    }

    let averages: Vec<String> = sums
        .iter()
        .map(|sum| {
            if succeeded == 0 {
                String::new()
            } else {
                (sum / succeeded as f64).to_string()
            }
        })
        .collect();
    let totals: Vec<String> = sums.iter().map(f64::to_string).collect();

    [
        format!("{},{},,", AVERAGE_ROW, averages.join(",")),
        format!("{},{},,", SUM_ROW, totals.join(",")),
    ]
}

/// Header line of the batch CSV
pub fn batch_header() -> String {
    let mut columns = vec!["Executable"];
    columns.extend_from_slice(CSV_HEADER);
    columns.extend_from_slice(&["Executable Size", "Elapsed Time", "Status", "Reason"]);
    columns.join(",")
}

/// Write a batch CSV with header and summary rows
///
/// **Public** - final step of the `batch` command
///
/// # Arguments
/// * `rows` - One entry per inspected executable, in output order
/// * `output_path` - Destination file; parent directories are created
///
/// # Errors
/// * `OutputError::InvalidPath` - path is empty, a directory, or its parent
///   cannot be created
/// * `OutputError::WriteFailed` - I/O error during write
pub fn write_batch_csv(rows: &[BatchRow], output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing {} rows to: {}", rows.len(), output_path.display());

    prepare_output_path(output_path)?;

    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", batch_header())?;
    for row in rows {
        writeln!(writer, "{}", row.to_csv_line())?;
    }
    for line in summary_lines(rows) {
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;

    Ok(())
}

/// Quote a field if it contains a separator, quote or line break
fn escape_field(field: &str) -> String {
    if field.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
