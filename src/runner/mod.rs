//! # Subprocess Execution & Output Capture
//!
//! Runs one external command to completion, multiplexing its stdout/stderr
//! streams, teeing stdout into an [`OutputSink`] while buffering both streams
//! for the caller, and classifying the exit status into a structured result.
//!
//! ## Core Components
//!
//! - **[`Invocation`]**: command specification with arguments, optional sink
//!   path, and optional timeout
//! - **[`OutputSink`]**: writable destination (file or discard) receiving a
//!   live copy of subprocess stdout
//! - **[`run`]**: the execution engine itself
//! - **[`CommandOutput`]**: successful outcome with exit code and captured
//!   stdout text
//! - **[`RunnerError`]**: structured failure taxonomy, formatted to text only
//!   at the protocol boundary
//!
//! ## Guarantees
//!
//! - The executable is resolved on `PATH` before the sink is opened or any
//!   process is spawned; resolution failure never leaves a sink dangling.
//! - Every stdout chunk is appended to the captured buffer and written to the
//!   sink before the next read; stderr chunks are buffered only and never
//!   forwarded to the sink.
//! - The sink is closed on every exit path (success, failure, spawn error,
//!   timeout), and closing is idempotent.
//! - Process-initiated termination (signal) is distinguishable from exit-code
//!   failure in the reported reason.
//!
//! No ordering is guaranteed between stdout chunks and stderr chunks within
//! one invocation; all chunks of both streams are captured by the time the
//! exit status is observed.

use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Output sink creation, mirroring, and idempotent teardown.
pub mod sink;

/// The spawn / multiplex / classify engine.
mod process;

pub use process::run;
pub use sink::OutputSink;

/// One execution of an external command, immutable once constructed
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Program name or path, resolved on `PATH` before spawning
    pub program: String,
    /// Command line arguments
    pub args: Vec<String>,
    /// Where to mirror live stdout; `None` discards
    pub sink_path: Option<PathBuf>,
    /// Maximum execution time (`None` = no deadline)
    pub timeout: Option<Duration>,
}

impl Invocation {
    /// Create a new invocation with just program and args
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            sink_path: None,
            timeout: None,
        }
    }

    /// Mirror live stdout to the given file path
    pub fn with_sink_path(mut self, path: PathBuf) -> Self {
        self.sink_path = Some(path);
        self
    }

    /// Set an execution deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Shell-quoted rendering of the command line, for diagnostics
    pub fn command_line(&self) -> String {
        let mut rendered = self.program.clone();
        for arg in &self.args {
            rendered.push(' ');
            rendered.push_str(&shell_escape::escape(Cow::from(arg.as_str())));
        }
        rendered
    }
}

/// Successful outcome of an invocation (exit code 0)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code reported by the process (always 0 here)
    pub exit_code: i32,
    /// Full captured stdout, chunks concatenated in arrival order
    pub stdout: String,
}

impl CommandOutput {
    /// Render the fixed success text exposed to tool callers
    pub fn render(&self) -> String {
        format!("success with code {}\n-------\n{}", self.exit_code, self.stdout)
    }
}

/// Why a process that did spawn failed to succeed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The process ran to completion with a non-zero exit code
    ExitCode(i32),
    /// The process was terminated by a signal before exiting
    Signal(i32),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::ExitCode(code) => write!(f, "exited with code {code}"),
            FailureReason::Signal(signal) => write!(f, "terminated by signal {signal}"),
        }
    }
}

/// Errors during subprocess execution.
///
/// Resolution, sink-creation, and spawn errors are fatal to the invocation
/// and never retried. `CommandFailed` is the expected failure mode and
/// carries the captured stderr so the external tool's failure can be
/// diagnosed without re-running it.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The executable could not be resolved; nothing was spawned
    #[error("Failed to locate {program}: {source}")]
    ExecutableNotFound {
        program: String,
        #[source]
        source: which::Error,
    },

    /// The output sink path could not be opened for writing
    #[error("Failed to create output stream at {}: {source}", .path.display())]
    SinkCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The executable exists but the process could not be started
    #[error("Process spawn failed: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process outlived its deadline and was killed
    #[error("Command timed out after {timeout:?}: {command_line}")]
    Timeout {
        command_line: String,
        timeout: Duration,
    },

    /// The process completed unsuccessfully (non-zero exit or signal)
    #[error("Command failed: {command_line} ({reason})\n-------\n{stderr}")]
    CommandFailed {
        command_line: String,
        reason: FailureReason,
        stderr: String,
    },

    /// I/O error while capturing output or waiting for the process
    #[error("IO error during command execution: {0}")]
    Io(#[from] std::io::Error),
}

impl RunnerError {
    /// The structured failure reason, when the process did run
    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            RunnerError::CommandFailed { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}
