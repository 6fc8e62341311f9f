//! Launchers for the two profiling tools.
//!
//! The stack client runs under DynamoRIO (`drrun`) and reports on stdout.
//! Valgrind reports on stderr and follows forked children.

use super::process::{run_with_timeout, ExitOutcome};
use crate::parser::schema::RawReport;
use crate::utils::config::{DEFAULT_DRRUN, DEFAULT_STACK_CLIENT, DEFAULT_TIMEOUT, DEFAULT_VALGRIND};
use crate::utils::error::{LaunchError, Tool};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

/// Executable under inspection and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub executable: PathBuf,
    pub args: Vec<String>,
}

impl Target {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }
}

/// Where the tools live and how long each may run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    pub drrun: PathBuf,
    pub stack_client: PathBuf,
    pub valgrind: PathBuf,

    /// Pass `-only_from_app` so library code is not counted
    pub only_from_app: bool,

    /// Wall-clock limit applied to each tool separately
    pub timeout: Duration,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            drrun: PathBuf::from(DEFAULT_DRRUN),
            stack_client: PathBuf::from(DEFAULT_STACK_CLIENT),
            valgrind: PathBuf::from(DEFAULT_VALGRIND),
            only_from_app: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Runs the stack instrumentation client
pub struct StackInspectorLauncher<'a> {
    config: &'a ToolConfig,
}

impl<'a> StackInspectorLauncher<'a> {
    pub fn new(config: &'a ToolConfig) -> Self {
        Self { config }
    }

    /// Command line: `drrun -c <client> [-only_from_app] -- <exe> <args>`
    pub fn command(&self, target: &Target) -> Command {
        let mut cmd = Command::new(&self.config.drrun);
        cmd.arg("-c").arg(&self.config.stack_client);
        if self.config.only_from_app {
            cmd.arg("-only_from_app");
        }
        cmd.arg("--").arg(&target.executable).args(&target.args);
        cmd
    }

    /// Run the client and return its stdout
    ///
    /// # Errors
    /// * `LaunchError::Spawn` - drrun could not be started
    /// * `LaunchError::Timeout` - the run exceeded the configured limit
    pub fn run(&self, target: &Target) -> Result<String, LaunchError> {
        info!("Running stack inspector on {}", target.executable.display());
        run_tool(Tool::StackInspector, self.command(target), self.config.timeout)
            .map(|(stdout, _)| stdout)
    }
}

/// Runs valgrind memcheck
pub struct ValgrindLauncher<'a> {
    config: &'a ToolConfig,
}

impl<'a> ValgrindLauncher<'a> {
    pub fn new(config: &'a ToolConfig) -> Self {
        Self { config }
    }

    /// Command line: `valgrind --trace-children=yes <exe> <args>`
    pub fn command(&self, target: &Target) -> Command {
        let mut cmd = Command::new(&self.config.valgrind);
        cmd.arg("--trace-children=yes")
            .arg(&target.executable)
            .args(&target.args);
        cmd
    }

    /// Run valgrind and return its stderr
    ///
    /// # Errors
    /// * `LaunchError::Spawn` - valgrind could not be started
    /// * `LaunchError::Timeout` - the run exceeded the configured limit
    pub fn run(&self, target: &Target) -> Result<String, LaunchError> {
        info!("Running valgrind on {}", target.executable.display());
        run_tool(Tool::Valgrind, self.command(target), self.config.timeout)
            .map(|(_, stderr)| stderr)
    }
}

/// Run both tools one after the other and collect their reports
///
/// **Public** - the process-execution half of an inspection
pub fn capture_raw_report(config: &ToolConfig, target: &Target) -> Result<RawReport, LaunchError> {
    let stack_output = StackInspectorLauncher::new(config).run(target)?;
    let heap_output = ValgrindLauncher::new(config).run(target)?;
    Ok(RawReport::new(stack_output, heap_output))
}

/// Run one tool and map its outcome onto `LaunchError`
///
/// **Private** - shared by both launchers
fn run_tool(tool: Tool, command: Command, limit: Duration) -> Result<(String, String), LaunchError> {
    let program = Path::new(command.get_program()).display().to_string();
    let captured = run_with_timeout(command, limit).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            LaunchError::Spawn { tool, source }
        } else {
            LaunchError::Io { tool, source }
        }
    })?;

    match captured.outcome {
        ExitOutcome::TimedOut => return Err(LaunchError::Timeout { tool, limit }),
        ExitOutcome::Exited(0) => {}
        ExitOutcome::Exited(code) => warn!("{} ({}) exited with code {}", tool, program, code),
        ExitOutcome::Signaled(signal) => {
            warn!("{} ({}) was terminated by signal {}", tool, program, signal)
        }
    }

    Ok((captured.stdout, captured.stderr))
}
