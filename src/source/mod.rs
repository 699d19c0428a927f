//! Log source abstraction for retrieving recent Conduit log lines.
//!
//! The telemetry pipeline only consumes already-retrieved text; this module
//! is where that text comes from. In production it is the systemd journal,
//! during development a plain log file.

mod file;
mod journal;

pub use file::FileSource;
pub use journal::JournalSource;

use std::fmt::Debug;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while retrieving log lines.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The log file could not be read.
    #[error("Read error for {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The log command exited unsuccessfully.
    #[error("{program} exited with {code}: {output}")]
    Command {
        program: String,
        code: i32,
        output: String,
    },
}

/// Trait for retrieving recent log lines of the monitored service.
///
/// Lines are returned in log order: oldest first, newest last.
///
/// # Example
///
/// ```no_run
/// use conduit_console::{FileSource, LogSource};
///
/// # tokio_test::block_on(async {
/// let source = FileSource::new("conduit.log", 200);
/// if let Ok(lines) = source.recent_lines().await {
///     println!("Got {} lines", lines.len());
/// }
/// # });
/// ```
#[async_trait]
pub trait LogSource: Send + Sync + Debug {
    /// Retrieve the most recent lines.
    async fn recent_lines(&self) -> Result<Vec<String>, SourceError>;

    /// Returns a human-readable description of the source.
    ///
    /// Used in log messages.
    fn description(&self) -> &str;
}
