//! Aggregation of parsed tool output into a final result.
//!
//! This module turns stack and heap stats into:
//! - An immutable `InspectionResult` with derived fractions
//! - Text and CSV renderings of that result

pub mod metrics;
pub mod report;

// Re-export main types and functions
pub use metrics::{aggregate, inspect_raw_report, InspectionResult};
