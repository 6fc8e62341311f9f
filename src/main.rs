//! Alloc Inspector CLI
//!
//! Runs an executable under a stack instrumentation client and valgrind,
//! then reports how its allocations split between stack and heap.

use alloc_inspector::commands::{
    display_header, display_version, execute_batch, execute_inspect, execute_parse,
    validate_args, BatchArgs, InspectArgs, OutputFormat, ParseArgs,
};
use alloc_inspector::launcher::{Target, ToolConfig};
use alloc_inspector::utils::config::{
    DEFAULT_BATCH_FILTER, DEFAULT_DRRUN, DEFAULT_STACK_CLIENT, DEFAULT_VALGRIND, DRRUN_ENV,
    EXIT_OTHER, STACK_CLIENT_ENV, VALGRIND_ENV,
};
use alloc_inspector::utils::InspectError;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// Alloc Inspector - stack vs heap allocation statistics
#[derive(Parser, Debug)]
#[command(name = "alloc-inspector")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Tool locations and limits shared by inspect and batch
#[derive(Args, Debug)]
struct ToolArgs {
    /// Per-tool time limit in seconds
    #[arg(long, default_value = "100")]
    timeout: u64,

    /// Path to DynamoRIO's drrun
    #[arg(long, env = DRRUN_ENV, default_value = DEFAULT_DRRUN)]
    drrun: PathBuf,

    /// Path to the stack inspector DynamoRIO client library
    #[arg(long, env = STACK_CLIENT_ENV, default_value = DEFAULT_STACK_CLIENT)]
    stack_client: PathBuf,

    /// Path to valgrind
    #[arg(long, env = VALGRIND_ENV, default_value = DEFAULT_VALGRIND)]
    valgrind: PathBuf,

    /// Only count stack allocations in the application's own code
    #[arg(long)]
    only_from_app: bool,
}

impl From<ToolArgs> for ToolConfig {
    fn from(args: ToolArgs) -> Self {
        ToolConfig {
            drrun: args.drrun,
            stack_client: args.stack_client,
            valgrind: args.valgrind,
            only_from_app: args.only_from_app,
            timeout: Duration::from_secs(args.timeout),
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run an executable under both tools and report its allocations
    Inspect {
        /// Executable to inspect
        executable: PathBuf,

        /// Arguments passed to the executable (after `--`)
        #[arg(last = true)]
        args: Vec<String>,

        #[command(flatten)]
        tools: ToolArgs,

        /// Print a single CSV line instead of the text report
        #[arg(long)]
        csv: bool,

        /// Also write a JSON report to this path
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Parse previously captured tool output
    Parse {
        /// File with the stack inspector's stdout
        #[arg(long)]
        stack: PathBuf,

        /// File with valgrind's stderr
        #[arg(long)]
        heap: PathBuf,

        /// Print a single CSV line instead of the text report
        #[arg(long)]
        csv: bool,
    },

    /// Inspect every test executable found under the given directories
    Batch {
        /// Directories to search recursively
        #[arg(required = true)]
        directories: Vec<PathBuf>,

        /// Output path for the CSV table
        #[arg(short, long, default_value = "inspection.csv")]
        output: PathBuf,

        /// Substring an executable's file name must contain
        #[arg(long, default_value = DEFAULT_BATCH_FILTER)]
        filter: String,

        #[command(flatten)]
        tools: ToolArgs,
    },

    /// Print the CSV column header
    Header,

    /// Display version information
    Version,
}

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return usage_exit(&e),
    };

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            let code = e
                .downcast_ref::<InspectError>()
                .map(InspectError::exit_code)
                .unwrap_or(EXIT_OTHER);
            ExitCode::from(code as u8)
        }
    }
}

/// Report a clap error, keeping usage mistakes off the tool exit codes
///
/// **Private** - clap's own exit status 2 would read as a heap tool timeout
fn usage_exit(error: &clap::Error) -> ExitCode {
    if let Err(e) = error.print() {
        eprintln!("error: {}", e);
    }
    ExitCode::from(usage_exit_code(error) as u8)
}

/// 0 for `--help`/`--version`, `EXIT_OTHER` for real usage errors
fn usage_exit_code(error: &clap::Error) -> i32 {
    if error.use_stderr() {
        EXIT_OTHER
    } else {
        0
    }
}

/// Execute one command
///
/// **Private** - separated from main so errors map onto exit codes
fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Inspect {
            executable,
            args,
            tools,
            csv,
            json,
        } => {
            let inspect_args = InspectArgs {
                target: Target::new(executable).with_args(args),
                tools: tools.into(),
                format: format_for(csv),
                output_json: json,
            };

            // Validate args first
            validate_args(&inspect_args)?;

            execute_inspect(inspect_args)?;
        }

        Commands::Parse { stack, heap, csv } => {
            execute_parse(ParseArgs {
                stack_output: stack,
                heap_output: heap,
                format: format_for(csv),
            })?;
        }

        Commands::Batch {
            directories,
            output,
            filter,
            tools,
        } => {
            execute_batch(BatchArgs {
                directories,
                name_filter: filter,
                output_csv: output,
                tools: tools.into(),
            })?;
        }

        Commands::Header => display_header(),

        Commands::Version => display_version(),
    }

    Ok(())
}

fn format_for(csv: bool) -> OutputFormat {
    if csv {
        OutputFormat::Csv
    } else {
        OutputFormat::Text
    }
}
