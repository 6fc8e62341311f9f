//! Configuration and constants for the CLI.

use std::time::Duration;

/// Default wall-clock limit for a single tool run
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(100);

/// Upper bound accepted for `--timeout` (one day)
pub const MAX_TIMEOUT_SECS: u64 = 24 * 3600;

/// Current JSON report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

// Report markers emitted by the profiling tools
pub const STACK_RESULTS_MARKER: &str = "Instrumentation results:";
pub const HEAP_USAGE_MARKER: &str = "total heap usage:";
pub const ERROR_SUMMARY_MARKER: &str = "ERROR SUMMARY:";

// Default tool locations, overridable from the CLI or the environment
pub const DEFAULT_DRRUN: &str = "drrun";
pub const DEFAULT_STACK_CLIENT: &str = "libstack_inspector.so";
pub const DEFAULT_VALGRIND: &str = "valgrind";

pub const DRRUN_ENV: &str = "ALLOC_INSPECTOR_DRRUN";
pub const STACK_CLIENT_ENV: &str = "ALLOC_INSPECTOR_STACK_CLIENT";
pub const VALGRIND_ENV: &str = "ALLOC_INSPECTOR_VALGRIND";

/// Substring a file name must contain to be picked up by `batch`
pub const DEFAULT_BATCH_FILTER: &str = "test";

/// Column order of `InspectionResult::render_csv`. Downstream tooling parses
/// these positionally, so the order only changes together with `SCHEMA_VERSION`.
pub const CSV_HEADER: &[&str] = &[
    "stack_allocs",
    "stack_runs",
    "heap_allocs",
    "heap_frees",
    "heap_memory",
    "avg_heap_alloc_sz",
    "heap_runs",
    "errors",
    "stack_fraction",
    "heap_fraction",
];

// Process exit codes
pub const EXIT_STACK_TIMEOUT: i32 = 1;
pub const EXIT_HEAP_TIMEOUT: i32 = 2;
pub const EXIT_STACK_PARSE: i32 = 3;
pub const EXIT_HEAP_PARSE: i32 = 4;
pub const EXIT_OTHER: i32 = 5;

/// Render `CSV_HEADER` as a single comma-separated line
pub fn csv_header_line() -> String {
    CSV_HEADER.join(",")
}
