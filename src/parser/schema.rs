//! Data types produced by the report parsers.
//!
//! Stats are plain counters. Anything derived from them (averages,
//! fractions) is computed on read, never stored next to the counters.

use serde::{Deserialize, Serialize};

/// Captured output of both profiling tools for one executable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReport {
    /// stdout of the stack instrumentation run
    pub stack_output: String,

    /// stderr of the valgrind run
    pub heap_output: String,
}

impl RawReport {
    pub fn new(stack_output: impl Into<String>, heap_output: impl Into<String>) -> Self {
        Self {
            stack_output: stack_output.into(),
            heap_output: heap_output.into(),
        }
    }
}

/// Aggregated stack instrumentation results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackStats {
    /// Sum of stack allocation instructions over all runs
    pub total_stack_allocs: u64,

    /// Number of "Instrumentation results:" lines found
    pub run_count: u64,
}

/// Aggregated valgrind heap summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeapStats {
    pub total_heap_allocs: u64,
    pub total_heap_frees: u64,
    pub total_heap_bytes: u64,

    /// Number of "total heap usage:" lines found (one per traced process)
    pub run_count: u64,

    /// Count from the last "ERROR SUMMARY:" line
    pub error_count: u64,
}

impl HeapStats {
    /// Mean bytes per heap allocation, 0 when nothing was allocated
    pub fn avg_alloc_size(&self) -> f64 {
        if self.total_heap_allocs == 0 {
            0.0
        } else {
            self.total_heap_bytes as f64 / self.total_heap_allocs as f64
        }
    }
}
