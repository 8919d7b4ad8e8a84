//! Integration tests for the subprocess runner and the command builders.
//!
//! These exercise the full run path against real processes (`sh`, `echo`)
//! and check the user-visible text contracts. Unit tests for individual
//! pieces live in the respective module files.

use mcp_devcontainers::runner::{CommandOutput, FailureReason, Invocation, RunnerError, run};
use std::time::Duration;
use tempfile::TempDir;

#[cfg(unix)]
#[tokio::test]
async fn success_text_contract() {
    let output = run(Invocation::new("echo", vec!["done".to_string()]))
        .await
        .unwrap();

    assert_eq!(output.render(), "success with code 0\n-------\ndone\n");
}

#[cfg(unix)]
#[tokio::test]
async fn failure_text_contract_names_command_and_code() {
    let result = run(Invocation::new(
        "sh",
        vec!["-c".to_string(), "echo broken >&2; exit 7".to_string()],
    ))
    .await;

    let error = result.unwrap_err();
    let message = error.to_string();
    assert!(message.starts_with("Command failed: sh -c"));
    assert!(message.contains("(exited with code 7)"));
    assert!(message.ends_with("-------\nbroken"));
    assert_eq!(error.failure_reason(), Some(FailureReason::ExitCode(7)));
}

#[cfg(unix)]
#[tokio::test]
async fn signal_termination_is_distinguishable_from_exit_code() {
    let result = run(Invocation::new(
        "sh",
        vec!["-c".to_string(), "kill -KILL $$".to_string()],
    ))
    .await;

    let error = result.unwrap_err();
    assert_eq!(error.failure_reason(), Some(FailureReason::Signal(9)));
    let message = error.to_string();
    assert!(message.contains("terminated by signal 9"));
    assert!(!message.contains("exited with code"));
}

#[cfg(unix)]
#[tokio::test]
async fn sink_round_trip_matches_returned_stdout() {
    let temp_dir = TempDir::new().unwrap();
    let sink_path = temp_dir.path().join("session.log");

    let output = run(
        Invocation::new(
            "sh",
            vec![
                "-c".to_string(),
                "printf 'alpha\\n'; printf beta; printf '\\ngamma\\n'".to_string(),
            ],
        )
        .with_sink_path(sink_path.clone()),
    )
    .await
    .unwrap();

    let mirrored = std::fs::read(&sink_path).unwrap();
    assert_eq!(mirrored, output.stdout.as_bytes());
    assert_eq!(output.stdout, "alpha\nbeta\ngamma\n");
}

#[cfg(unix)]
#[tokio::test]
async fn sink_is_written_even_when_the_command_fails() {
    let temp_dir = TempDir::new().unwrap();
    let sink_path = temp_dir.path().join("session.log");

    let result = run(
        Invocation::new(
            "sh",
            vec![
                "-c".to_string(),
                "printf partial; echo err >&2; exit 2".to_string(),
            ],
        )
        .with_sink_path(sink_path.clone()),
    )
    .await;

    assert!(matches!(result, Err(RunnerError::CommandFailed { .. })));
    // Stdout produced before the failure still reached the sink.
    assert_eq!(std::fs::read(&sink_path).unwrap(), b"partial");
}

#[tokio::test]
async fn unresolvable_executable_rejects_without_side_effects() {
    let temp_dir = TempDir::new().unwrap();
    let sink_path = temp_dir.path().join("never-created.log");

    let result = run(
        Invocation::new("mcp-devcontainers-no-such-binary", vec![])
            .with_sink_path(sink_path.clone()),
    )
    .await;

    match result {
        Err(RunnerError::ExecutableNotFound { program, .. }) => {
            assert_eq!(program, "mcp-devcontainers-no-such-binary");
        }
        other => panic!("expected ExecutableNotFound, got {other:?}"),
    }
    assert!(!sink_path.exists());
}

#[cfg(unix)]
#[tokio::test]
async fn timeout_is_reported_with_the_command_line() {
    let result = run(
        Invocation::new("sleep", vec!["10".to_string()])
            .with_timeout(Duration::from_millis(50)),
    )
    .await;

    match result {
        Err(RunnerError::Timeout {
            command_line,
            timeout,
        }) => {
            assert_eq!(command_line, "sleep 10");
            assert_eq!(timeout, Duration::from_millis(50));
        }
        other => panic!("expected Timeout, got {other:?}"),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn large_output_is_captured_completely() {
    // Exceeds one pipe buffer and many read chunks.
    let output = run(Invocation::new(
        "sh",
        vec![
            "-c".to_string(),
            "i=0; while [ $i -lt 20000 ]; do echo line-$i; i=$((i+1)); done".to_string(),
        ],
    ))
    .await
    .unwrap();

    let lines: Vec<&str> = output.stdout.lines().collect();
    assert_eq!(lines.len(), 20000);
    assert_eq!(lines[0], "line-0");
    assert_eq!(lines[19999], "line-19999");
}

#[cfg(unix)]
#[tokio::test]
async fn empty_stdout_renders_empty_body() {
    let output = run(Invocation::new("true", vec![])).await.unwrap();
    assert_eq!(
        output,
        CommandOutput {
            exit_code: 0,
            stdout: String::new(),
        }
    );
    assert_eq!(output.render(), "success with code 0\n-------\n");
}
