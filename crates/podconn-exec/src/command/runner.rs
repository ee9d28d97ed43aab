use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::{ExecError, command::CommandSpec};

/// Max stderr length carried into error messages.
const MAX_STDERR_LEN: usize = 4096;

/// Run `spec` to completion and return its stdout.
///
/// A non-zero exit is an error carrying (truncated) stderr. The child is
/// killed if the returned future is dropped before completion.
pub async fn run_captured(spec: &CommandSpec) -> Result<String, ExecError> {
    spec.validate()?;
    spec.trace_state();

    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = cmd.output().await.map_err(|source| ExecError::Spawn {
        program: spec.program.clone(),
        source,
    })?;

    if !output.status.success() {
        let status = match output.status.code() {
            Some(code) => format!("exit code {code}"),
            None => "signal".to_string(),
        };
        return Err(ExecError::NonZeroExit {
            program: spec.program.clone(),
            status,
            stderr: truncate(String::from_utf8_lossy(&output.stderr).trim()),
        });
    }

    if !output.stderr.is_empty() {
        debug!(
            program = %spec.program,
            stderr = %truncate(String::from_utf8_lossy(&output.stderr).trim()),
            "command wrote to stderr",
        );
    }
    String::from_utf8(output.stdout)
        .map_err(|e| ExecError::InvalidOutput(format!("stdout is not utf-8: {e}")))
}

fn truncate(s: &str) -> String {
    if s.len() <= MAX_STDERR_LEN {
        return s.to_string();
    }
    let mut end = MAX_STDERR_LEN;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout() {
        let spec = CommandSpec::new("sh").args(["-c", "echo 42"]);
        assert_eq!(run_captured(&spec).await.unwrap(), "42\n");
    }

    #[tokio::test]
    async fn passes_extra_env() {
        let spec = CommandSpec::new("sh")
            .args(["-c", "printf %s \"$PODCONN_TEST\""])
            .env("PODCONN_TEST", "hello");
        assert_eq!(run_captured(&spec).await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn non_zero_exit_carries_stderr() {
        let spec = CommandSpec::new("sh").args(["-c", "echo 'pod not found' >&2; exit 3"]);
        let err = run_captured(&spec).await.unwrap_err();

        match err {
            ExecError::NonZeroExit { status, stderr, .. } => {
                assert_eq!(status, "exit code 3");
                assert_eq!(stderr, "pod not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_program_is_spawn_error() {
        let spec = CommandSpec::new("/nonexistent/podconn-test-binary");
        let err = run_captured(&spec).await.unwrap_err();
        assert!(matches!(err, ExecError::Spawn { .. }));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let long = "é".repeat(MAX_STDERR_LEN);
        let out = truncate(&long);
        assert!(out.ends_with("..."));
        assert!(out.len() <= MAX_STDERR_LEN + 3);
    }
}
