//! External command execution.
//!
//! Everything the dashboard learns from or does to the host beyond procfs
//! goes through [`run`]: reading the journal, asking systemd for liveness
//! and invoking the maintenance scripts.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

/// Exit code reported when a command could not run to completion.
pub const FAILED_EXIT_CODE: i32 = 1;

/// Combined result of running an external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Trimmed stdout, followed by trimmed stderr on its own line when
    /// stderr is not empty.
    pub output: String,
    /// Process exit code. [`FAILED_EXIT_CODE`] if the process could not be
    /// spawned, was killed by a signal or timed out.
    pub code: i32,
}

impl CommandOutput {
    /// Returns true if the command exited with status 0.
    pub fn success(&self) -> bool {
        self.code == 0
    }

    fn failed(message: String) -> Self {
        Self {
            output: message,
            code: FAILED_EXIT_CODE,
        }
    }
}

/// Run `program` with `args`, waiting at most `timeout`.
///
/// Never fails; problems are reported through [`CommandOutput::code`] and
/// the output text. The child is killed if the timeout expires.
pub async fn run(program: &str, args: &[&str], timeout: Duration) -> CommandOutput {
    debug!("Running {} {}", program, args.join(" "));

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = match tokio::time::timeout(timeout, command.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => return CommandOutput::failed(format!("Failed to run {}: {}", program, e)),
        Err(_) => {
            return CommandOutput::failed(format!(
                "{} timed out after {:?}",
                program, timeout
            ))
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    CommandOutput {
        output: join_output(stdout.trim(), stderr.trim()),
        code: output.status.code().unwrap_or(FAILED_EXIT_CODE),
    }
}

fn join_output(stdout: &str, stderr: &str) -> String {
    match (stdout.is_empty(), stderr.is_empty()) {
        (_, true) => stdout.to_string(),
        (true, false) => stderr.to_string(),
        (false, false) => format!("{}\n{}", stdout, stderr),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(10);

    #[test]
    fn test_join_output() {
        assert_eq!(join_output("", ""), "");
        assert_eq!(join_output("out", ""), "out");
        assert_eq!(join_output("", "err"), "err");
        assert_eq!(join_output("out", "err"), "out\nerr");
    }

    #[tokio::test]
    async fn test_run_captures_both_streams_and_code() {
        let result = run("sh", &["-c", "echo ' out '; echo err >&2; exit 3"], TIMEOUT).await;
        assert_eq!(result.output, "out\nerr");
        assert_eq!(result.code, 3);
        assert!(!result.success());
    }

    #[tokio::test]
    async fn test_run_success() {
        let result = run("sh", &["-c", "printf 'a\\nb\\n'"], TIMEOUT).await;
        assert_eq!(result.output, "a\nb");
        assert!(result.success());
    }

    #[tokio::test]
    async fn test_run_spawn_failure() {
        let result = run("/nonexistent/definitely-not-here", &[], TIMEOUT).await;
        assert_eq!(result.code, FAILED_EXIT_CODE);
        assert!(result.output.contains("Failed to run"));
    }

    #[tokio::test]
    async fn test_run_timeout() {
        let result = run("sleep", &["5"], Duration::from_millis(50)).await;
        assert_eq!(result.code, FAILED_EXIT_CODE);
        assert!(result.output.contains("timed out"));
    }
}
