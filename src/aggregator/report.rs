//! Text and CSV renderings of an inspection result.

use super::metrics::InspectionResult;
use std::fmt;

impl InspectionResult {
    /// Human-readable multi-line report, one field per line
    ///
    /// **Public** - printed by `inspect` and `parse` without `--csv`
    pub fn render_text(&self) -> String {
        self.to_string()
    }

    /// Single CSV line in `CSV_HEADER` order
    ///
    /// **Public** - stable positional format for downstream tooling
    ///
    /// Floats use the shortest representation that round-trips.
    pub fn render_csv(&self) -> String {
        let stack = self.stack();
        let heap = self.heap();
        format!(
            "{},{},{},{},{},{},{},{},{},{}",
            stack.total_stack_allocs,
            stack.run_count,
            heap.total_heap_allocs,
            heap.total_heap_frees,
            heap.total_heap_bytes,
            self.avg_alloc_size(),
            heap.run_count,
            heap.error_count,
            self.stack_fraction(),
            self.heap_fraction()
        )
    }
}

impl fmt::Display for InspectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stack = self.stack();
        let heap = self.heap();
        writeln!(f, "stack allocations: {}", stack.total_stack_allocs)?;
        writeln!(f, "stack inspector runs: {}", stack.run_count)?;
        writeln!(f, "heap allocations: {}", heap.total_heap_allocs)?;
        writeln!(f, "heap frees: {}", heap.total_heap_frees)?;
        writeln!(f, "heap bytes allocated: {}", heap.total_heap_bytes)?;
        writeln!(f, "heap average allocation size: {:.2}", self.avg_alloc_size())?;
        writeln!(f, "valgrind runs: {}", heap.run_count)?;
        writeln!(f, "valgrind error summary: {}", heap.error_count)?;
        writeln!(
            f,
            "stack allocations fraction: {:.2}%",
            self.stack_fraction() * 100.0
        )?;
        write!(
            f,
            "heap allocations fraction: {:.2}%",
            self.heap_fraction() * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::aggregate;
    use crate::parser::schema::{HeapStats, StackStats};
    use crate::utils::config::CSV_HEADER;
    use pretty_assertions::assert_eq;

    fn sample() -> InspectionResult {
        aggregate(
            StackStats {
                total_stack_allocs: 30,
                run_count: 1,
            },
            HeapStats {
                total_heap_allocs: 10,
                total_heap_frees: 9,
                total_heap_bytes: 640,
                run_count: 2,
                error_count: 3,
            },
        )
    }

    #[test]
    fn test_render_text() {
        let expected = "\
stack allocations: 30
stack inspector runs: 1
heap allocations: 10
heap frees: 9
heap bytes allocated: 640
heap average allocation size: 64.00
valgrind runs: 2
valgrind error summary: 3
stack allocations fraction: 75.00%
heap allocations fraction: 25.00%";
        assert_eq!(sample().render_text(), expected);
    }

    #[test]
    fn test_render_csv() {
        assert_eq!(sample().render_csv(), "30,1,10,9,640,64,2,3,0.75,0.25");
    }

    #[test]
    fn test_csv_matches_header_width() {
        let line = sample().render_csv();
        assert_eq!(line.split(',').count(), CSV_HEADER.len());
    }
}
