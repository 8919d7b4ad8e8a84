//! Spawns one external command and captures its output.
//!
//! The stdout/stderr pipes are drained with a `tokio::select!` loop so the
//! two streams are multiplexed without ordering assumptions between them.
//! Each stdout chunk is appended to the capture buffer and mirrored into the
//! sink before the next read is issued, so a successful invocation's sink
//! content matches the returned stdout byte-for-byte.

use super::sink::OutputSink;
use super::{CommandOutput, FailureReason, Invocation, RunnerError};
use std::process::{ExitStatus, Stdio};
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tracing::debug;

/// Run an external command to completion.
///
/// Resolution happens before anything else: a program that cannot be found
/// on `PATH` fails without opening a sink or spawning a process. The sink is
/// closed on every exit path.
///
/// # Errors
///
/// - [`RunnerError::ExecutableNotFound`] if the program cannot be resolved
/// - [`RunnerError::SinkCreation`] if the sink path cannot be opened
/// - [`RunnerError::Spawn`] if the resolved program cannot be started
/// - [`RunnerError::Timeout`] if the invocation outlives its deadline
/// - [`RunnerError::CommandFailed`] for non-zero exit or signal termination,
///   carrying the captured stderr text
pub async fn run(invocation: Invocation) -> Result<CommandOutput, RunnerError> {
    let resolved =
        which::which(&invocation.program).map_err(|source| RunnerError::ExecutableNotFound {
            program: invocation.program.clone(),
            source,
        })?;

    let mut sink = OutputSink::open(invocation.sink_path.as_deref()).await?;
    let command_line = invocation.command_line();
    debug!(command = %command_line, "spawning external command");

    let mut child = match Command::new(&resolved)
        .args(&invocation.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(source) => {
            sink.close().await;
            return Err(RunnerError::Spawn {
                program: invocation.program.clone(),
                source,
            });
        }
    };

    let captured = match invocation.timeout {
        Some(deadline) if !deadline.is_zero() => {
            match tokio::time::timeout(deadline, capture(&mut child, &mut sink)).await {
                Ok(result) => result,
                Err(_) => {
                    let _ = child.kill().await;
                    sink.close().await;
                    return Err(RunnerError::Timeout {
                        command_line,
                        timeout: deadline,
                    });
                }
            }
        }
        _ => capture(&mut child, &mut sink).await,
    };
    sink.close().await;
    let (status, stdout, stderr) = captured?;

    debug!(
        command = %command_line,
        exit_code = status.code().unwrap_or(-1),
        stdout_bytes = stdout.len(),
        stderr_bytes = stderr.len(),
        "external command completed"
    );

    if status.success() {
        Ok(CommandOutput {
            exit_code: status.code().unwrap_or(0),
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
        })
    } else {
        Err(RunnerError::CommandFailed {
            command_line,
            reason: termination_reason(status),
            stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
        })
    }
}

/// Drain both pipes and wait for the exit status.
///
/// Stdout bytes go to the buffer and the sink; stderr bytes go to their own
/// buffer only. By the time the status is returned, both pipes have hit EOF.
async fn capture(
    child: &mut Child,
    sink: &mut OutputSink,
) -> Result<(ExitStatus, Vec<u8>, Vec<u8>), RunnerError> {
    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| std::io::Error::other("child stdout was not captured"))?;
    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| std::io::Error::other("child stderr was not captured"))?;

    let mut stdout_buffer = Vec::new();
    let mut stderr_buffer = Vec::new();
    let mut stdout_chunk = [0u8; 8192];
    let mut stderr_chunk = [0u8; 8192];
    let mut stdout_done = false;
    let mut stderr_done = false;

    while !(stdout_done && stderr_done) {
        tokio::select! {
            read = stdout.read(&mut stdout_chunk), if !stdout_done => match read? {
                0 => stdout_done = true,
                n => {
                    stdout_buffer.extend_from_slice(&stdout_chunk[..n]);
                    sink.write(&stdout_chunk[..n]).await;
                }
            },
            read = stderr.read(&mut stderr_chunk), if !stderr_done => match read? {
                0 => stderr_done = true,
                n => stderr_buffer.extend_from_slice(&stderr_chunk[..n]),
            },
        }
    }

    let status = child.wait().await?;
    Ok((status, stdout_buffer, stderr_buffer))
}

#[cfg(unix)]
fn termination_reason(status: ExitStatus) -> FailureReason {
    use std::os::unix::process::ExitStatusExt;
    match status.signal() {
        Some(signal) => FailureReason::Signal(signal),
        None => FailureReason::ExitCode(status.code().unwrap_or(-1)),
    }
}

#[cfg(not(unix))]
fn termination_reason(status: ExitStatus) -> FailureReason {
    FailureReason::ExitCode(status.code().unwrap_or(-1))
}
