//! Parser for the stack instrumentation client output.
//!
//! The client prints one line per instrumented process:
//!
//! ```text
//! Instrumentation results: 1234 stack allocation instructions executed.
//! ```
//!
//! A traced program that forks produces several of these lines.

use super::scan::{leading_uint_after, marker_lines};
use super::schema::StackStats;
use crate::utils::config::STACK_RESULTS_MARKER;
use crate::utils::error::ParseError;
use log::debug;

/// Extract stack allocation counts from the instrumentation output
///
/// **Public** - main entry point for stack output parsing
///
/// # Arguments
/// * `output` - Everything drrun wrote to stdout, program output included
///
/// # Returns
/// Summed allocation count and the number of instrumented processes
///
/// # Errors
/// * `ParseErrorKind::StackFormat` - the marker never appears, a marker line
///   carries no readable count, or the sum overflows
///
/// # Example
/// ```ignore
/// let stats = extract_stack_stats("Instrumentation results: 8\nInstrumentation results: 22\n")?;
/// assert_eq!(stats.total_stack_allocs, 30);
/// ```
pub fn extract_stack_stats(output: &str) -> Result<StackStats, ParseError> {
    let mut stats = StackStats::default();

    for line in marker_lines(output, STACK_RESULTS_MARKER) {
        let allocs = leading_uint_after(line, STACK_RESULTS_MARKER).ok_or_else(|| {
            ParseError::stack("unable to read instrumentation result", line)
        })?;

        stats.total_stack_allocs = stats
            .total_stack_allocs
            .checked_add(allocs)
            .ok_or_else(|| ParseError::stack("stack allocation total overflows u64", line))?;
        stats.run_count += 1;
    }

    if stats.run_count == 0 {
        return Err(ParseError::stack(
            format!("there is no \"{}\" string in the output", STACK_RESULTS_MARKER),
            output,
        ));
    }

    debug!(
        "Stack output: {} allocations over {} run(s)",
        stats.total_stack_allocs, stats.run_count
    );

    Ok(stats)
}
