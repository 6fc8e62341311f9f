//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod batch;
pub mod inspect;
pub mod models;
pub mod parse;
pub mod utils;

// Re-export main command functions
pub use batch::{collect_executables, execute_batch};
pub use inspect::{execute_inspect, inspect_target, validate_args, validate_tools};
pub use models::{BatchArgs, InspectArgs, OutputFormat, ParseArgs};
pub use parse::{execute_parse, parse_files};
pub use utils::{display_header, display_version};
