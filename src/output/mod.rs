//! Output writers for inspection results.
//!
//! This module handles writing data to disk in various formats:
//! - JSON reports
//! - Batch CSV tables

pub mod csv;
pub mod json;

// Re-export main functions
pub use self::csv::{batch_header, summary_lines, write_batch_csv, BatchRow, AVERAGE_ROW, SUM_ROW};
pub use self::json::{read_report, write_report, InspectionReport};
