//! Combine stack and heap statistics into one inspection result.
//!
//! Derived values are fixed when the result is built. The struct has no
//! setters, and deserialisation goes through the same constructor, so the
//! fractions can never disagree with the counters.

use crate::parser::schema::{HeapStats, RawReport, StackStats};
use crate::parser::{extract_heap_stats, extract_stack_stats};
use crate::utils::error::ParseError;
use log::debug;
use serde::{Deserialize, Serialize};

/// Final, immutable statistics for one inspected executable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ResultCounters")]
pub struct InspectionResult {
    stack: StackStats,
    heap: HeapStats,
    avg_alloc_size: f64,
    stack_fraction: f64,
    heap_fraction: f64,
}

/// Serialized counters an `InspectionResult` is rebuilt from
#[derive(Deserialize)]
struct ResultCounters {
    stack: StackStats,
    heap: HeapStats,
}

impl From<ResultCounters> for InspectionResult {
    fn from(counters: ResultCounters) -> Self {
        Self::new(counters.stack, counters.heap)
    }
}

impl InspectionResult {
    /// Build a result and compute every derived field
    pub fn new(stack: StackStats, heap: HeapStats) -> Self {
        let (stack_fraction, heap_fraction) =
            allocation_fractions(stack.total_stack_allocs, heap.total_heap_allocs);

        Self {
            stack,
            heap,
            avg_alloc_size: heap.avg_alloc_size(),
            stack_fraction,
            heap_fraction,
        }
    }

    pub fn stack(&self) -> &StackStats {
        &self.stack
    }

    pub fn heap(&self) -> &HeapStats {
        &self.heap
    }

    /// Mean bytes per heap allocation
    pub fn avg_alloc_size(&self) -> f64 {
        self.avg_alloc_size
    }

    /// Share of all allocations that happened on the stack, in `[0, 1]`
    pub fn stack_fraction(&self) -> f64 {
        self.stack_fraction
    }

    /// Share of all allocations that happened on the heap, in `[0, 1]`
    pub fn heap_fraction(&self) -> f64 {
        self.heap_fraction
    }

    /// Stack plus heap allocations
    pub fn total_allocs(&self) -> u64 {
        self.stack
            .total_stack_allocs
            .saturating_add(self.heap.total_heap_allocs)
    }
}

/// Combine the two extractors' results
///
/// **Public** - total function, never fails
pub fn aggregate(stack: StackStats, heap: HeapStats) -> InspectionResult {
    InspectionResult::new(stack, heap)
}

/// Parse both captured outputs and aggregate them
///
/// **Public** - the whole parse → aggregate pipeline for one executable
///
/// # Errors
/// * `ParseErrorKind::StackFormat` - stack output is not understood
/// * `ParseErrorKind::HeapFormat` - valgrind output is not understood
pub fn inspect_raw_report(raw: &RawReport) -> Result<InspectionResult, ParseError> {
    let stack = extract_stack_stats(&raw.stack_output)?;
    let heap = extract_heap_stats(&raw.heap_output)?;

    let result = aggregate(stack, heap);
    debug!(
        "Aggregated {} allocations ({:.1}% stack)",
        result.total_allocs(),
        result.stack_fraction() * 100.0
    );

    Ok(result)
}

/// Stack and heap shares of all allocations, both 0 when there are none
///
/// **Private** - internal helper for InspectionResult::new
fn allocation_fractions(stack_allocs: u64, heap_allocs: u64) -> (f64, f64) {
    let total = stack_allocs as f64 + heap_allocs as f64;
    if total == 0.0 {
        return (0.0, 0.0);
    }
    let stack_fraction = stack_allocs as f64 / total;
    (stack_fraction, 1.0 - stack_fraction)
}
