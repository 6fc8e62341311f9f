//! Run a child process with captured output and a wall-clock limit.

use log::{debug, warn};
use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

/// How often a running child is polled for exit
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How long output pipes may stay open once the child is gone
const DRAIN_GRACE: Duration = Duration::from_secs(1);

/// Size of each read from a child pipe
const CHUNK_SIZE: usize = 8 * 1024;

/// How the child process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Normal exit with a status code
    Exited(i32),
    /// Terminated by a signal (unix only)
    Signaled(i32),
    /// Still running at the deadline and killed by us
    TimedOut,
}

/// Everything a finished child left behind
#[derive(Debug, Clone)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
    pub outcome: ExitOutcome,
}

/// Spawn `command`, capture stdout/stderr, and kill it after `limit`
///
/// **Public** - shared by both tool launchers
///
/// Both pipes are drained on their own threads so a chatty child can't
/// block on a full pipe while we wait for it. Once the child is gone, any
/// process left in its group is killed and the pipes get `DRAIN_GRACE` to
/// close; whatever was read by then is returned.
///
/// A `limit` too large to add to the current instant means no limit.
///
/// # Arguments
/// * `command` - Fully built command; its stdio settings are overridden
/// * `limit` - Wall-clock budget for the child
///
/// # Returns
/// Captured stdout, stderr and how the child ended
///
/// # Errors
/// Returns the `io::Error` from spawning or waiting on the child.
pub fn run_with_timeout(mut command: Command, limit: Duration) -> io::Result<CapturedOutput> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    isolate_process_group(&mut command);

    debug!("Spawning {:?} with a {:?} limit", command, limit);
    let mut child = command.spawn()?;

    let stdout_reader = drain(child.stdout.take());
    let stderr_reader = drain(child.stderr.take());

    let deadline = Instant::now().checked_add(limit);
    let outcome = match wait_until(&mut child, deadline)? {
        Some(status) => {
            // Forked children may still hold the pipes open
            kill_group(child.id());
            outcome_of(status)
        }
        None => {
            warn!("Process {} exceeded {:?}, killing it", child.id(), limit);
            kill_tree(&mut child);
            child.wait()?;
            ExitOutcome::TimedOut
        }
    };

    let drain_deadline = Instant::now() + DRAIN_GRACE;
    Ok(CapturedOutput {
        stdout: collect(stdout_reader, drain_deadline),
        stderr: collect(stderr_reader, drain_deadline),
        outcome,
    })
}

/// Poll `child` until it exits or `deadline` passes
fn wait_until(child: &mut Child, deadline: Option<Instant>) -> io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<Receiver<Vec<u8>>> {
    pipe.map(|mut pipe| {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut chunk = [0u8; CHUNK_SIZE];
            loop {
                match pipe.read(&mut chunk) {
                    Ok(0) => break,
                    Ok(n) => {
                        if tx.send(chunk[..n].to_vec()).is_err() {
                            break;
                        }
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => {
                        warn!("Failed to read child output: {}", e);
                        break;
                    }
                }
            }
        });
        rx
    })
}

/// Gather chunks until the reader hits end-of-file or `deadline` passes
fn collect(reader: Option<Receiver<Vec<u8>>>, deadline: Instant) -> String {
    let mut bytes = Vec::new();
    if let Some(rx) = reader {
        loop {
            match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                Ok(chunk) => bytes.extend_from_slice(&chunk),
                Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {
                    warn!("Output pipe still open after the child exited, keeping partial output");
                    bytes.extend(rx.try_iter().flatten());
                    break;
                }
            }
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(unix)]
fn isolate_process_group(command: &mut Command) {
    use std::os::unix::process::CommandExt;
    command.process_group(0);
}

#[cfg(not(unix))]
fn isolate_process_group(_command: &mut Command) {}

/// Kill the child and, on unix, every process in its group.
///
/// Traced programs fork, and orphaned grandchildren would otherwise keep
/// the output pipes open.
fn kill_tree(child: &mut Child) {
    if kill_group(child.id()) {
        return;
    }
    if let Err(e) = child.kill() {
        warn!("Failed to kill process {}: {}", child.id(), e);
    }
}

/// SIGKILL every process in the group led by `pid`; false if nothing was killed
#[cfg(unix)]
fn kill_group(pid: u32) -> bool {
    let group = format!("-{}", pid);
    match Command::new("kill")
        .args(["-KILL", "--", group.as_str()])
        .stderr(Stdio::null())
        .status()
    {
        Ok(status) if status.success() => true,
        Ok(status) => {
            debug!("kill {} exited with {}", group, status);
            false
        }
        Err(e) => {
            debug!("Could not run kill for {}: {}", group, e);
            false
        }
    }
}

#[cfg(not(unix))]
fn kill_group(_pid: u32) -> bool {
    false
}

#[cfg(unix)]
fn outcome_of(status: ExitStatus) -> ExitOutcome {
    use std::os::unix::process::ExitStatusExt;
    match (status.code(), status.signal()) {
        (Some(code), _) => ExitOutcome::Exited(code),
        (None, Some(signal)) => ExitOutcome::Signaled(signal),
        (None, None) => ExitOutcome::Exited(-1),
    }
}

#[cfg(not(unix))]
fn outcome_of(status: ExitStatus) -> ExitOutcome {
    ExitOutcome::Exited(status.code().unwrap_or(-1))
}
