//! systemd journal log source.
//!
//! Reads the tail of a unit's journal through `journalctl`. The dashboard
//! runs unprivileged, so the call goes through a non-interactive `sudo`
//! that the host's sudoers grants for exactly this command.

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::{LogSource, SourceError};
use crate::command::{self, CommandOutput};

const SUDO: &str = "sudo";
const JOURNALCTL: &str = "/bin/journalctl";

/// A log source that reads recent journal entries for a systemd unit.
#[derive(Debug)]
pub struct JournalSource {
    unit: String,
    tail: usize,
    timeout: Duration,
    description: String,
}

impl JournalSource {
    /// Create a source for the last `tail` journal lines of `unit`.
    ///
    /// The `journalctl` call is abandoned after `timeout`.
    pub fn new(unit: impl Into<String>, tail: usize, timeout: Duration) -> Self {
        let unit = unit.into();
        let description = format!("journal: {}", unit);
        Self {
            unit,
            tail,
            timeout,
            description,
        }
    }

    /// Returns the unit whose journal is read.
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Arguments passed to `sudo`.
    fn args(&self) -> Vec<String> {
        vec![
            "-n".to_string(),
            JOURNALCTL.to_string(),
            "-u".to_string(),
            self.unit.clone(),
            "-n".to_string(),
            self.tail.to_string(),
            "--no-pager".to_string(),
        ]
    }
}

#[async_trait]
impl LogSource for JournalSource {
    async fn recent_lines(&self) -> Result<Vec<String>, SourceError> {
        let args = self.args();
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        output_lines(command::run(SUDO, &args, self.timeout).await)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Split `journalctl` output into lines.
///
/// A failed call still yields whatever it printed; only a failure with no
/// output at all is an error.
fn output_lines(result: CommandOutput) -> Result<Vec<String>, SourceError> {
    if !result.success() {
        if result.output.is_empty() {
            return Err(SourceError::Command {
                program: JOURNALCTL.to_string(),
                code: result.code,
                output: result.output,
            });
        }
        warn!(
            "{} exited with {}, using its partial output",
            JOURNALCTL, result.code
        );
    }

    Ok(result.output.lines().map(|l| l.to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_journal_source_args() {
        let source = JournalSource::new("conduit.service", 200, Duration::from_secs(5));
        assert_eq!(source.unit(), "conduit.service");
        assert_eq!(source.description(), "journal: conduit.service");
        assert_eq!(
            source.args(),
            vec![
                "-n",
                "/bin/journalctl",
                "-u",
                "conduit.service",
                "-n",
                "200",
                "--no-pager"
            ]
        );
    }

    #[test]
    fn test_output_lines_success() {
        let lines = output_lines(CommandOutput {
            output: "first\nsecond".to_string(),
            code: 0,
        })
        .unwrap();
        assert_eq!(lines, vec!["first", "second"]);
    }

    #[test]
    fn test_output_lines_keeps_partial_output_on_failure() {
        let lines = output_lines(CommandOutput {
            output: "2026-01-31 05:33:39 [STATS] Connecting: 4 | Connected: 19 | Up: 950.0 MB | Down: 8.7 GB\njournalctl: read error".to_string(),
            code: 1,
        })
        .unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(conduit_telemetry::snapshot_from_lines(&lines).connected, 19);
    }

    #[test]
    fn test_output_lines_empty_failure_is_error() {
        let err = output_lines(CommandOutput {
            output: String::new(),
            code: 1,
        })
        .unwrap_err();
        assert!(matches!(err, SourceError::Command { code: 1, .. }));
    }
}
