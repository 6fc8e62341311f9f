use crate::launcher::{Target, ToolConfig};
use std::path::PathBuf;

/// How a single result is printed to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Csv,
}

/// Arguments for the inspect command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct InspectArgs {
    /// Executable to inspect and its arguments
    pub target: Target,

    /// Tool locations and time limit
    pub tools: ToolConfig,

    /// Printed result format
    pub format: OutputFormat,

    /// Optional path for a JSON report
    pub output_json: Option<PathBuf>,
}

impl InspectArgs {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            tools: ToolConfig::default(),
            format: OutputFormat::default(),
            output_json: None,
        }
    }
}

/// Arguments for the parse command
#[derive(Debug, Clone)]
pub struct ParseArgs {
    /// File holding captured stack inspector stdout
    pub stack_output: PathBuf,

    /// File holding captured valgrind stderr
    pub heap_output: PathBuf,

    pub format: OutputFormat,
}

/// Arguments for the batch command
#[derive(Debug, Clone)]
pub struct BatchArgs {
    /// Directories searched recursively for executables
    pub directories: Vec<PathBuf>,

    /// Substring a file name must contain to be inspected
    pub name_filter: String,

    /// Destination of the batch CSV
    pub output_csv: PathBuf,

    pub tools: ToolConfig,
}
