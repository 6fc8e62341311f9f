//! Alloc Inspector
//!
//! Measures how a native executable splits its allocations between the
//! stack and the heap. The target runs once under a DynamoRIO client that
//! counts stack allocation instructions and once under valgrind memcheck;
//! the textual reports of both tools are parsed and combined.
//!
//! This crate provides the core implementation for the
//! `alloc-inspector` CLI tool.
//!
//! ## Getting Started
//!
//! ```bash
//! cargo install alloc-inspector
//! alloc-inspector inspect ./build/my_test
//! ```
//!
//! The parsers can also be used on their own:
//!
//! ```
//! use alloc_inspector::aggregator::inspect_raw_report;
//! use alloc_inspector::parser::RawReport;
//!
//! let raw = RawReport::new(
//!     "Instrumentation results: 30 stack allocation instructions executed.\n",
//!     "==1== total heap usage: 12 allocs, 10 frees, 480 bytes allocated\n\
//!      ==1== ERROR SUMMARY: 0 errors from 0 contexts\n",
//! );
//! let result = inspect_raw_report(&raw).unwrap();
//! assert_eq!(result.heap().total_heap_allocs, 12);
//! assert!((result.stack_fraction() - 30.0 / 42.0).abs() < 1e-9);
//! ```

pub mod aggregator;
pub mod commands;
pub mod launcher;
pub mod output;
pub mod parser;
pub mod utils;
