use alloc_inspector::parser::scan::parse_comma_number;
use alloc_inspector::parser::{extract_heap_stats, extract_stack_stats, HeapStats, StackStats};
use alloc_inspector::utils::ParseErrorKind;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// Format `n` the way valgrind does: 1234567 -> "1,234,567"
fn with_commas(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn heap_line(pid: u32, allocs: u64, frees: u64, bytes: u64) -> String {
    format!(
        "=={pid}==   total heap usage: {} allocs, {} frees, {} bytes allocated\n",
        with_commas(allocs),
        with_commas(frees),
        with_commas(bytes)
    )
}

#[test]
fn test_stack_example_two_runs() {
    let out = "Instrumentation results: 8\n...Instrumentation results: 22\n";
    let stats = extract_stack_stats(out).unwrap();
    assert_eq!(
        stats,
        StackStats {
            total_stack_allocs: 30,
            run_count: 2
        }
    );
}

#[test]
fn test_stack_output_mixed_with_program_output() {
    let out = "\
hello from the test program
Instrumentation results: 120 stack allocation instructions executed.
child says hi
Instrumentation results: 5 stack allocation instructions executed.
";
    let stats = extract_stack_stats(out).unwrap();
    assert_eq!(stats.total_stack_allocs, 125);
    assert_eq!(stats.run_count, 2);
}

#[test]
fn test_stack_empty_output_is_format_error() {
    let err = extract_stack_stats("").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::StackFormat);
}

#[test]
fn test_heap_example() {
    let out = "total heap usage: 1,000 allocs, 998 frees, 64,000 bytes allocated\nERROR SUMMARY: 0 errors\n";
    let stats = extract_heap_stats(out).unwrap();
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
fn test_heap_forked_children_are_summed() {
    let out = format!(
        "{}{}==100== ERROR SUMMARY: 1 errors from 1 contexts\n{}==99== ERROR SUMMARY: 4 errors from 2 contexts\n",
        heap_line(100, 10, 10, 1_000),
        "==100== \n",
        heap_line(99, 2_500, 2_400, 1_234_567),
    );
    let stats = extract_heap_stats(&out).unwrap();
    assert_eq!(stats.total_heap_allocs, 2_510);
    assert_eq!(stats.total_heap_frees, 2_410);
    assert_eq!(stats.total_heap_bytes, 1_235_567);
    assert_eq!(stats.run_count, 2);
    assert_eq!(stats.error_count, 4);
}

#[test]
fn test_last_error_summary_wins() {
    let out = "\
total heap usage: 1 allocs, 1 frees, 8 bytes allocated
ERROR SUMMARY: 9 errors
ERROR SUMMARY: 2 errors
";
    assert_eq!(extract_heap_stats(out).unwrap().error_count, 2);
}

#[test]
fn test_malformed_heap_line_aborts_everything() {
    let out = format!(
        "{}==2== total heap usage: many allocs, 1 frees, 8 bytes allocated\n==2== ERROR SUMMARY: 0 errors\n",
        heap_line(1, 5, 5, 50)
    );
    let err = extract_heap_stats(&out).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::HeapFormat);
    assert!(err.offending_text.contains("many allocs"));
}

#[test]
fn test_misplaced_comma_is_format_error() {
    let out = "total heap usage: 1,,000 allocs, 998 frees, 64,000 bytes allocated\nERROR SUMMARY: 0 errors\n";
    let err = extract_heap_stats(out).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::HeapFormat);
    assert!(err.offending_text.contains("1,,000"));
}

#[test]
fn test_with_commas_helper() {
    assert_eq!(with_commas(0), "0");
    assert_eq!(with_commas(999), "999");
    assert_eq!(with_commas(1_000), "1,000");
    assert_eq!(with_commas(1_234_567), "1,234,567");
}

proptest! {
    #[test]
    fn prop_stack_sums_every_run(counts in prop::collection::vec(0u64..1_000_000, 1..20)) {
        let out: String = counts
            .iter()
            .map(|n| format!("noise\nInstrumentation results: {} stack allocation instructions executed.\n", n))
            .collect();

        let stats = extract_stack_stats(&out).unwrap();
        prop_assert_eq!(stats.run_count, counts.len() as u64);
        prop_assert_eq!(stats.total_stack_allocs, counts.iter().sum::<u64>());
    }

    #[test]
    fn prop_stack_without_marker_fails(text in "[a-z \n]{0,200}") {
        let err = extract_stack_stats(&text).unwrap_err();
        prop_assert_eq!(err.kind, ParseErrorKind::StackFormat);
    }

    #[test]
    fn prop_comma_numbers_match_plain(n in any::<u64>()) {
        prop_assert_eq!(parse_comma_number(&with_commas(n)), Some(n));
        prop_assert_eq!(parse_comma_number(&n.to_string()), Some(n));
    }

    #[test]
    fn prop_heap_sums_every_run(
        runs in prop::collection::vec((0u64..10_000_000, 0u64..10_000_000, 0u64..1_000_000_000), 1..10),
        errors in prop::collection::vec(0u64..100, 1..5),
    ) {
        let mut out = String::new();
        for (i, (allocs, frees, bytes)) in runs.iter().enumerate() {
            out.push_str(&heap_line(i as u32, *allocs, *frees, *bytes));
        }
        for e in &errors {
            out.push_str(&format!("==0== ERROR SUMMARY: {} errors from 0 contexts\n", e));
        }

        let stats = extract_heap_stats(&out).unwrap();
        prop_assert_eq!(stats.run_count, runs.len() as u64);
        prop_assert_eq!(stats.total_heap_allocs, runs.iter().map(|r| r.0).sum::<u64>());
        prop_assert_eq!(stats.total_heap_frees, runs.iter().map(|r| r.1).sum::<u64>());
        prop_assert_eq!(stats.total_heap_bytes, runs.iter().map(|r| r.2).sum::<u64>());
        prop_assert_eq!(Some(stats.error_count), errors.last().copied());
    }
}
