//! Tool output parsing and schema definitions.
//!
//! This module handles:
//! - Locating report lines in raw tool output
//! - Decoding valgrind's comma-grouped numbers
//! - Summing counts across traced processes

pub mod scan;
pub mod schema;
pub mod stack_inspector;
pub mod valgrind;

// Re-export main types
pub use schema::{HeapStats, RawReport, StackStats};
pub use stack_inspector::extract_stack_stats;
pub use valgrind::{extract_heap_stats, parse_heap_usage_line, HeapUsage};
