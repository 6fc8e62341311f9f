//! Inspect command implementation.
//!
//! The inspect command:
//! 1. Runs the target under the stack instrumentation client
//! 2. Runs the target under valgrind
//! 3. Parses both outputs
//! 4. Aggregates the statistics
//! 5. Prints the result and optionally writes a JSON report

use super::models::{InspectArgs, OutputFormat};
use crate::aggregator::{inspect_raw_report, InspectionResult};
use crate::launcher::{capture_raw_report, Target, ToolConfig};
use crate::output::{write_report, InspectionReport};
use crate::utils::config::MAX_TIMEOUT_SECS;
use crate::utils::error::InspectError;
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Execute the inspect command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Target, tool configuration and output options
///
/// # Returns
/// The aggregated result that was printed
///
/// # Errors
/// * Tool launch failures and timeouts
/// * Unrecognised tool output
/// * JSON report write errors
///
/// Failures keep their `InspectError` reachable through `downcast_ref`,
/// which main.rs uses to pick the exit code.
///
/// # Example
/// ```ignore
/// let args = InspectArgs {
///     output_json: Some(PathBuf::from("report.json")),
///     ..InspectArgs::new(Target::new("./test_vector").with_args(vec!["--quick".into()]))
/// };
///
/// execute_inspect(args)?;
/// ```
pub fn execute_inspect(args: InspectArgs) -> Result<InspectionResult> {
    let start_time = Instant::now();

    info!("Starting inspection of: {}", args.target.executable.display());

    let result = inspect_target(&args.tools, &args.target)
        .with_context(|| format!("Failed to inspect {}", args.target.executable.display()))?;

    let elapsed = start_time.elapsed().as_secs_f64();

    match args.format {
        OutputFormat::Text => println!("{}", result.render_text()),
        OutputFormat::Csv => println!("{}", result.render_csv()),
    }

    if let Some(path) = &args.output_json {
        let report = InspectionReport::new(
            args.target.executable.display().to_string(),
            elapsed,
            result.clone(),
        );
        write_report(&report, path)
            .map_err(InspectError::from)
            .context("Failed to write JSON report")?;
        info!("✓ Report written to: {}", path.display());
    }

    info!("Inspection completed in {:.2}s", elapsed);

    Ok(result)
}

/// Run both tools on `target` and aggregate their output
///
/// **Public** - shared by the inspect and batch commands
///
/// # Arguments
/// * `tools` - Where drrun, the client library and valgrind live, plus the limit
/// * `target` - Executable and its arguments
///
/// # Errors
/// `InspectError::Launch` if either tool fails to run or times out,
/// `InspectError::Parse` if its output is not recognised.
pub fn inspect_target(tools: &ToolConfig, target: &Target) -> Result<InspectionResult, InspectError> {
    let raw = capture_raw_report(tools, target)?;
    debug!(
        "Captured {} bytes of stack output, {} bytes of valgrind output",
        raw.stack_output.len(),
        raw.heap_output.len()
    );
    Ok(inspect_raw_report(&raw)?)
}

/// Validate inspect arguments
///
/// **Public** - can be called before execute_inspect for early validation
pub fn validate_args(args: &InspectArgs) -> Result<()> {
    let executable = &args.target.executable;

    if executable.as_os_str().is_empty() {
        anyhow::bail!("Executable path cannot be empty");
    }

    if !executable.is_file() {
        anyhow::bail!("Executable not found: {}", executable.display());
    }

    validate_tools(&args.tools)
}

/// Validate tool settings shared by inspect and batch
///
/// **Public** - also used by the batch command
pub fn validate_tools(tools: &ToolConfig) -> Result<()> {
    let secs = tools.timeout.as_secs();
    if tools.timeout.is_zero() {
        anyhow::bail!("timeout must be greater than 0");
    }

    if secs > MAX_TIMEOUT_SECS {
        anyhow::bail!("timeout is too large (max {}s)", MAX_TIMEOUT_SECS);
    }

    for (name, path) in [
        ("drrun", &tools.drrun),
        ("stack client", &tools.stack_client),
        ("valgrind", &tools.valgrind),
    ] {
        if path.as_os_str().is_empty() {
            anyhow::bail!("{} path cannot be empty", name);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn args_for(path: PathBuf) -> InspectArgs {
        InspectArgs::new(Target::new(path))
    }

    #[test]
    fn test_validate_args_valid() {
        let exe = NamedTempFile::new().unwrap();
        assert!(validate_args(&args_for(exe.path().to_path_buf())).is_ok());
    }

    #[test]
    fn test_validate_args_missing_executable() {
        let args = args_for(PathBuf::from("/nonexistent/app"));
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_args(&args_for(dir.path().to_path_buf())).is_err());
    }

    #[test]
    fn test_validate_args_empty_executable() {
        assert!(validate_args(&args_for(PathBuf::new())).is_err());
    }

    #[test]
    fn test_validate_tools_zero_timeout() {
        let tools = ToolConfig {
            timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(validate_tools(&tools).is_err());
    }

    #[test]
    fn test_validate_tools_timeout_too_large() {
        let tools = ToolConfig {
            timeout: Duration::from_secs(MAX_TIMEOUT_SECS + 1),
            ..Default::default()
        };
        assert!(validate_tools(&tools).is_err());
    }

    #[test]
    fn test_validate_tools_empty_valgrind() {
        let tools = ToolConfig {
            valgrind: PathBuf::new(),
            ..Default::default()
        };
        assert!(validate_tools(&tools).is_err());
    }

    #[test]
    fn test_inspect_target_missing_tool() {
        let tools = ToolConfig {
            drrun: PathBuf::from("/nonexistent/drrun"),
            ..Default::default()
        };
        let err = inspect_target(&tools, &Target::new("/bin/true")).unwrap_err();
        assert!(matches!(err, InspectError::Launch(_)));
    }
}
