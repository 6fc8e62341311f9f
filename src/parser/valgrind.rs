//! Parser for valgrind memcheck output.
//!
//! Each traced process ends with a heap summary:
//!
//! ```text
//! ==4242== HEAP SUMMARY:
//! ==4242==     in use at exit: 0 bytes in 0 blocks
//! ==4242==   total heap usage: 1,000 allocs, 998 frees, 64,000 bytes allocated
//! ...
//! ==4242== ERROR SUMMARY: 0 errors from 0 contexts (suppressed: 0 from 0)
//! ```
//!
//! With `--trace-children=yes` there is one "total heap usage" line per
//! process. Error summaries are cumulative, so only the last one counts.

use super::scan::{last_marker_line, leading_uint_after, marker_lines, parse_comma_number};
use super::schema::HeapStats;
use crate::utils::config::{ERROR_SUMMARY_MARKER, HEAP_USAGE_MARKER};
use crate::utils::error::ParseError;
use log::debug;

/// Counters from one "total heap usage" line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapUsage {
    pub allocs: u64,
    pub frees: u64,
    pub bytes: u64,
}

/// Extract heap statistics from valgrind's stderr
///
/// **Public** - main entry point for valgrind output parsing
///
/// # Errors
/// * `ParseErrorKind::HeapFormat` - no heap usage line, a malformed heap
///   usage line, or a missing/unreadable error summary
pub fn extract_heap_stats(output: &str) -> Result<HeapStats, ParseError> {
    let mut stats = HeapStats::default();

    for line in marker_lines(output, HEAP_USAGE_MARKER) {
        let usage = parse_heap_usage_line(line)?;
        accumulate(&mut stats, usage, line)?;
    }

    if stats.run_count == 0 {
        return Err(ParseError::heap(
            format!("unable to find \"{}\"", HEAP_USAGE_MARKER),
            output,
        ));
    }

    stats.error_count = parse_error_summary(output)?;

    debug!(
        "Valgrind output: {} allocs, {} frees, {} bytes over {} run(s), {} error(s)",
        stats.total_heap_allocs,
        stats.total_heap_frees,
        stats.total_heap_bytes,
        stats.run_count,
        stats.error_count
    );

    Ok(stats)
}

/// Parse `total heap usage: <A> allocs, <B> frees, <C> bytes allocated`
///
/// **Public** - exposed for callers that inspect single lines
pub fn parse_heap_usage_line(line: &str) -> Result<HeapUsage, ParseError> {
    let malformed = || ParseError::heap("unable to read total heap usage", line);

    let rest = line.strip_prefix(HEAP_USAGE_MARKER).ok_or_else(malformed)?;
    let tokens: Vec<&str> = rest.split_whitespace().collect();

    match tokens.as_slice() {
        [allocs, "allocs,", frees, "frees,", bytes, "bytes", "allocated", ..] => Ok(HeapUsage {
            allocs: parse_comma_number(allocs).ok_or_else(malformed)?,
            frees: parse_comma_number(frees).ok_or_else(malformed)?,
            bytes: parse_comma_number(bytes).ok_or_else(malformed)?,
        }),
        _ => Err(malformed()),
    }
}

/// Read the error count from the last "ERROR SUMMARY:" line
fn parse_error_summary(output: &str) -> Result<u64, ParseError> {
    let line = last_marker_line(output, ERROR_SUMMARY_MARKER).ok_or_else(|| {
        ParseError::heap(
            format!("there is no line that contains \"{}\"", ERROR_SUMMARY_MARKER),
            output,
        )
    })?;

    leading_uint_after(line, ERROR_SUMMARY_MARKER)
        .ok_or_else(|| ParseError::heap("unable to read ERROR SUMMARY", line))
}

fn accumulate(stats: &mut HeapStats, usage: HeapUsage, line: &str) -> Result<(), ParseError> {
    let overflow = || ParseError::heap("heap usage total overflows u64", line);

    stats.total_heap_allocs = stats
        .total_heap_allocs
        .checked_add(usage.allocs)
        .ok_or_else(overflow)?;
    stats.total_heap_frees = stats
        .total_heap_frees
        .checked_add(usage.frees)
        .ok_or_else(overflow)?;
    stats.total_heap_bytes = stats
        .total_heap_bytes
        .checked_add(usage.bytes)
        .ok_or_else(overflow)?;
    stats.run_count += 1;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ParseErrorKind;

    const SINGLE_RUN: &str = "\
==4242== Memcheck, a memory error detector
==4242== HEAP SUMMARY:
==4242==     in use at exit: 0 bytes in 0 blocks
==4242==   total heap usage: 1,000 allocs, 998 frees, 64,000 bytes allocated
==4242==
==4242== ERROR SUMMARY: 0 errors from 0 contexts (suppressed: 0 from 0)
";

    #[test]
    fn test_single_run() {
        let stats = extract_heap_stats(SINGLE_RUN).unwrap();
        assert_eq!(
            stats,
            HeapStats {
                total_heap_allocs: 1000,
                total_heap_frees: 998,
                total_heap_bytes: 64000,
                run_count: 1,
                error_count: 0,
            }
        );
        assert_eq!(stats.avg_alloc_size(), 64.0);
    }

    #[test]
    fn test_parse_heap_usage_line() {
        let usage =
            parse_heap_usage_line("total heap usage: 2 allocs, 1 frees, 1,024 bytes allocated")
                .unwrap();
        assert_eq!(
            usage,
            HeapUsage {
                allocs: 2,
                frees: 1,
                bytes: 1024
            }
        );
    }

    #[test]
    fn test_truncated_usage_line_fails() {
        let out = "==1== total heap usage: 2 allocs, 1 frees\n==1== ERROR SUMMARY: 0 errors\n";
        let err = extract_heap_stats(out).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::HeapFormat);
        assert_eq!(err.offending_text, "total heap usage: 2 allocs, 1 frees");
    }

    #[test]
    fn test_missing_error_summary() {
        let out = "==1== total heap usage: 2 allocs, 1 frees, 8 bytes allocated\n";
        let err = extract_heap_stats(out).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::HeapFormat);
        assert!(err.detail.contains("ERROR SUMMARY"));
    }

    #[test]
    fn test_unreadable_error_summary() {
        let out = "total heap usage: 2 allocs, 1 frees, 8 bytes allocated\nERROR SUMMARY: none\n";
        let err = extract_heap_stats(out).unwrap_err();
        assert_eq!(err.offending_text, "ERROR SUMMARY: none");
    }

    #[test]
    fn test_missing_heap_usage() {
        let err = extract_heap_stats("==1== ERROR SUMMARY: 0 errors\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::HeapFormat);
        assert!(err.detail.contains("total heap usage"));
    }
}
