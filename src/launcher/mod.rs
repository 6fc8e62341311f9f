//! Process execution for the profiling tools.
//!
//! Spawns drrun and valgrind against the target, enforces a wall-clock
//! limit, and returns the captured text for the parsers.

pub mod process;
pub mod tools;

pub use process::{run_with_timeout, CapturedOutput, ExitOutcome};
pub use tools::{capture_raw_report, StackInspectorLauncher, Target, ToolConfig, ValgrindLauncher};
