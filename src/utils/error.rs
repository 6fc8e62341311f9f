//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use super::config::{
    EXIT_HEAP_PARSE, EXIT_HEAP_TIMEOUT, EXIT_OTHER, EXIT_STACK_PARSE, EXIT_STACK_TIMEOUT,
};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// The external profiling tool an error relates to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// DynamoRIO client counting stack allocation instructions
    StackInspector,
    /// Valgrind memcheck
    Valgrind,
}

impl Tool {
    pub fn name(self) -> &'static str {
        match self {
            Tool::StackInspector => "stack_inspector",
            Tool::Valgrind => "valgrind",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which report format failed to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Stack instrumentation output
    StackFormat,
    /// Valgrind heap summary output
    HeapFormat,
}

impl ParseErrorKind {
    pub fn tool(self) -> Tool {
        match self {
            ParseErrorKind::StackFormat => Tool::StackInspector,
            ParseErrorKind::HeapFormat => Tool::Valgrind,
        }
    }
}

/// A tool report that does not match the expected format.
///
/// `offending_text` holds the line that failed to parse, or the whole
/// captured output when a required marker is missing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unexpected {} output: {detail}. The output was: {offending_text}", .kind.tool())]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub detail: String,
    pub offending_text: String,
}

impl ParseError {
    pub fn stack(detail: impl Into<String>, offending_text: impl Into<String>) -> Self {
        Self {
            kind: ParseErrorKind::StackFormat,
            detail: detail.into(),
            offending_text: offending_text.into(),
        }
    }

    pub fn heap(detail: impl Into<String>, offending_text: impl Into<String>) -> Self {
        Self {
            kind: ParseErrorKind::HeapFormat,
            detail: detail.into(),
            offending_text: offending_text.into(),
        }
    }
}

/// Errors that can occur while running a profiling tool
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("{tool} is killed due to exceeding the time limit of {}s", .limit.as_secs_f64())]
    Timeout { tool: Tool, limit: Duration },

    #[error("failed to start {tool}: {source}")]
    Spawn {
        tool: Tool,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error while running {tool}: {source}")]
    Io {
        tool: Tool,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Everything that can go wrong during one inspection
#[derive(Error, Debug)]
pub enum InspectError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Launch(#[from] LaunchError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

impl InspectError {
    /// Process exit code for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            InspectError::Launch(LaunchError::Timeout { tool, .. }) => match tool {
                Tool::StackInspector => EXIT_STACK_TIMEOUT,
                Tool::Valgrind => EXIT_HEAP_TIMEOUT,
            },
            InspectError::Parse(e) => match e.kind {
                ParseErrorKind::StackFormat => EXIT_STACK_PARSE,
                ParseErrorKind::HeapFormat => EXIT_HEAP_PARSE,
            },
            _ => EXIT_OTHER,
        }
    }
}
