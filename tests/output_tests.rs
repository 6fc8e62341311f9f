use alloc_inspector::aggregator::aggregate;
use alloc_inspector::output::{
    batch_header, read_report, summary_lines, write_batch_csv, write_report, BatchRow,
    InspectionReport,
};
use alloc_inspector::parser::{HeapStats, StackStats};
use alloc_inspector::utils::config::SCHEMA_VERSION;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

fn sample_row(executable: &str) -> BatchRow {
    BatchRow {
        executable: executable.to_string(),
        result: Ok(aggregate(
            StackStats {
                total_stack_allocs: 3,
                run_count: 1,
            },
            HeapStats {
                total_heap_allocs: 1,
                total_heap_frees: 1,
                total_heap_bytes: 32,
                run_count: 1,
                error_count: 0,
            },
        )),
        executable_size: 4096,
        elapsed_secs: 0.25,
    }
}

#[test]
fn test_batch_header() {
    assert_eq!(
        batch_header(),
        "Executable,stack_allocs,stack_runs,heap_allocs,heap_frees,heap_memory,\
avg_heap_alloc_sz,heap_runs,errors,stack_fraction,heap_fraction,\
Executable Size,Elapsed Time,Status,Reason"
    );
}

#[test]
fn test_write_batch_csv() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested/batch.csv");
    let failed = BatchRow {
        result: Err("stack_inspector is killed, timeout".to_string()),
        ..sample_row("bin/test_slow")
    };

    write_batch_csv(&[sample_row("bin/test_fast"), failed], &path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[1], "bin/test_fast,3,1,1,1,32,32,1,0,0.75,0.25,4096,0.25,True,");
    assert_eq!(
        lines[2],
        "bin/test_slow,,,,,,,,,,,4096,0.25,False,\"stack_inspector is killed, timeout\""
    );
    assert_eq!(lines[3], "AVERAGE,3,1,1,1,32,32,1,0,0.75,0.25,4096,0.25,,");
    assert_eq!(lines[4], "SUM,3,1,1,1,32,32,1,0,0.75,0.25,4096,0.25,,");
}

#[test]
fn test_summary_rows_skip_failures() {
    let slow = BatchRow {
        executable_size: 2048,
        elapsed_secs: 0.75,
        ..sample_row("bin/test_slow")
    };
    let failed = BatchRow {
        result: Err("valgrind is killed, timeout".to_string()),
        executable_size: 1_000_000,
        ..sample_row("bin/test_hang")
    };

    let [average, sum] = summary_lines(&[sample_row("bin/test_fast"), failed, slow]);

    assert_eq!(average, "AVERAGE,3,1,1,1,32,32,1,0,0.75,0.25,3072,0.5,,");
    assert_eq!(sum, "SUM,6,2,2,2,64,64,2,0,1.5,0.5,6144,1,,");
}

#[test]
fn test_write_batch_csv_rejects_directory() {
    let dir = tempdir().unwrap();
    assert!(write_batch_csv(&[], dir.path()).is_err());
}

#[test]
fn test_report_round_trip_keeps_counters() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.json");
    let row = sample_row("bin/test_fast");
    let result = row.result.clone().unwrap();
    let report = InspectionReport::new("bin/test_fast", 0.25, result.clone());

    write_report(&report, &path).unwrap();
    let loaded = read_report(&path).unwrap();

    assert_eq!(loaded.version, SCHEMA_VERSION);
    assert_eq!(loaded.result.stack(), result.stack());
    assert_eq!(loaded.result.heap(), result.heap());
    assert_eq!(loaded.result.stack_fraction(), 0.75);
}

#[test]
fn test_read_report_invalid_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();
    assert!(read_report(&path).is_err());
}
