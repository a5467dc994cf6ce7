//! Blocking external command with a hard timeout.
//!
//! The child runs under a throwaway current-thread tokio runtime so the wait
//! can be bounded with `tokio::time::timeout`. The child is spawned with
//! `kill_on_drop`, so abandoning the wait on timeout also kills it.

use crate::EngineError;
use std::ffi::OsStr;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Trimmed stderr, falling back to trimmed stdout when stderr is empty.
    pub fn diagnostic(&self) -> &str {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim()
        } else {
            stderr
        }
    }
}

impl From<std::process::Output> for CommandOutput {
    fn from(output: std::process::Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Run `program` with `args`, capturing stdout and stderr.
///
/// Blocks until the child exits or `timeout` elapses. On timeout the child
/// is killed and [`EngineError::Timeout`] is returned; there is no partial
/// output. A program that cannot be found yields [`EngineError::NotFound`].
pub fn run_command<S: AsRef<OsStr>>(
    program: &str,
    args: &[S],
    timeout: Duration,
) -> Result<CommandOutput, EngineError> {
    if program.is_empty() {
        return Err(EngineError::EmptyCommand);
    }

    let command_line = std::iter::once(program.to_string())
        .chain(args.iter().map(|a| a.as_ref().to_string_lossy().into_owned()))
        .collect::<Vec<_>>()
        .join(" ");
    tracing::debug!(command = %command_line, timeout_secs = timeout.as_secs_f64(), "spawning");

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let child = command.spawn().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => EngineError::NotFound(program.to_string()),
            _ => EngineError::Io(e),
        })?;

        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(output) => Ok(CommandOutput::from(output?)),
            Err(_) => {
                tracing::debug!(command = %command_line, "timed out, child killed");
                Err(EngineError::Timeout(timeout))
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_diagnostic_prefers_stderr() {
        let output = CommandOutput {
            code: Some(1),
            stdout: "stdout text\n".to_string(),
            stderr: "  stderr text \n".to_string(),
        };
        assert_eq!(output.diagnostic(), "stderr text");
    }

    #[test]
    fn test_diagnostic_falls_back_to_stdout() {
        let output = CommandOutput {
            code: Some(1),
            stdout: "\n only stdout \n".to_string(),
            stderr: "   \n".to_string(),
        };
        assert_eq!(output.diagnostic(), "only stdout");
    }

    #[test]
    fn test_missing_program() {
        let result = run_command(
            "flowport-no-such-binary-xyz",
            &["--version"],
            Duration::from_secs(5),
        );
        assert!(matches!(result, Err(EngineError::NotFound(name)) if name == "flowport-no-such-binary-xyz"));
    }

    #[test]
    fn test_empty_program() {
        let result = run_command("", &[] as &[&str], Duration::from_secs(1));
        assert!(matches!(result, Err(EngineError::EmptyCommand)));
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_streams_and_exit_code() {
        let output = run_command(
            "sh",
            &["-c", "echo out; echo err >&2; exit 3"],
            Duration::from_secs(10),
        )
        .unwrap();
        assert_eq!(output.code, Some(3));
        assert!(!output.success());
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_zero_exit_is_success() {
        let output = run_command("sh", &["-c", "exit 0"], Duration::from_secs(10)).unwrap();
        assert!(output.success());
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_child() {
        let start = Instant::now();
        let result = run_command("sh", &["-c", "sleep 5"], Duration::from_millis(200));
        assert!(matches!(result, Err(EngineError::Timeout(_))));
        assert!(start.elapsed() < Duration::from_secs(4));
    }
}
