//! File-based log source.
//!
//! Reads the tail of a plain text log file.
//!
//! Only the end of the file is read, in chunks from the back, until enough
//! lines are buffered. Invalid UTF-8 is replaced rather than rejected, so one
//! corrupt line does not hide the rest of the log.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use super::{LogSource, SourceError};

/// Bytes read per step when scanning backwards from the end of the file.
const CHUNK_SIZE: u64 = 64 * 1024;

/// A log source that reads the last lines of a text file.
///
/// Useful when Conduit logs to a file instead of the journal, and for
/// running the dashboard on a development machine.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    tail: usize,
    description: String,
}

impl FileSource {
    /// Create a new file source returning at most `tail` lines.
    pub fn new<P: AsRef<Path>>(path: P, tail: usize) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            tail,
            description,
        }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LogSource for FileSource {
    async fn recent_lines(&self) -> Result<Vec<String>, SourceError> {
        let bytes = read_tail(&self.path, self.tail)
            .await
            .map_err(|source| SourceError::Read {
                path: self.path.clone(),
                source,
            })?;

        let content = String::from_utf8_lossy(&bytes);
        let lines: Vec<&str> = content.lines().collect();
        let start = lines.len().saturating_sub(self.tail);
        Ok(lines[start..].iter().map(|l| l.to_string()).collect())
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Read the end of `path` holding at least its last `lines` lines.
///
/// Once more than `lines` newlines are buffered, the last `lines` lines are
/// complete and any partial line at the front is dropped by the caller.
async fn read_tail(path: &Path, lines: usize) -> std::io::Result<Vec<u8>> {
    let mut file = File::open(path).await?;
    let mut start = file.metadata().await?.len();
    let mut buf = Vec::new();
    let mut newlines = 0;

    while start > 0 && newlines <= lines {
        let len = CHUNK_SIZE.min(start);
        start -= len;

        let mut chunk = vec![0u8; len as usize];
        file.seek(SeekFrom::Start(start)).await?;
        file.read_exact(&mut chunk).await?;

        newlines += chunk.iter().filter(|&&b| b == b'\n').count();
        chunk.extend_from_slice(&buf);
        buf = chunk;
    }

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/conduit.log", 10);
        assert_eq!(source.path(), Path::new("/tmp/conduit.log"));
        assert_eq!(source.description(), "file: /tmp/conduit.log");
    }

    #[tokio::test]
    async fn test_file_source_returns_tail_in_order() {
        let mut file = NamedTempFile::new().unwrap();
        for i in 0..5 {
            writeln!(file, "line {}", i).unwrap();
        }

        let source = FileSource::new(file.path(), 3);
        let lines = source.recent_lines().await.unwrap();
        assert_eq!(lines, vec!["line 2", "line 3", "line 4"]);
    }

    #[tokio::test]
    async fn test_file_source_short_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "only line").unwrap();

        let source = FileSource::new(file.path(), 200);
        let lines = source.recent_lines().await.unwrap();
        assert_eq!(lines, vec!["only line"]);
    }

    #[tokio::test]
    async fn test_file_source_empty_file() {
        let file = NamedTempFile::new().unwrap();
        let source = FileSource::new(file.path(), 200);
        assert!(source.recent_lines().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_source_tail_of_large_file() {
        let mut file = NamedTempFile::new().unwrap();
        for i in 0..10_000 {
            writeln!(file, "2026-01-31 05:33:09 noise line number {:05}", i).unwrap();
        }

        let source = FileSource::new(file.path(), 3);
        let lines = source.recent_lines().await.unwrap();
        assert_eq!(
            lines,
            vec![
                "2026-01-31 05:33:09 noise line number 09997",
                "2026-01-31 05:33:09 noise line number 09998",
                "2026-01-31 05:33:09 noise line number 09999",
            ]
        );
    }

    #[tokio::test]
    async fn test_file_source_tail_spans_chunks() {
        let mut file = NamedTempFile::new().unwrap();
        for i in 0..10_000 {
            writeln!(file, "line {}", i).unwrap();
        }
        write!(file, "unterminated").unwrap();

        let source = FileSource::new(file.path(), 9_000);
        let lines = source.recent_lines().await.unwrap();
        assert_eq!(lines.len(), 9_000);
        assert_eq!(lines[0], "line 1001");
        assert_eq!(lines[8_998], "line 9999");
        assert_eq!(lines[8_999], "unterminated");
    }

    #[tokio::test]
    async fn test_file_source_invalid_utf8_line() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "2026-01-31 05:33:09 [STATS] Connecting: 2 | Connected: 15 | Up: 900.0 MB | Down: 8.0 GB").unwrap();
        file.write_all(b"garbled \xff\xfe bytes\n").unwrap();
        writeln!(file, "2026-01-31 05:33:39 [STATS] Connecting: 4 | Connected: 19 | Up: 950.0 MB | Down: 8.7 GB").unwrap();

        let source = FileSource::new(file.path(), 200);
        let lines = source.recent_lines().await.unwrap();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("garbled "));

        let snapshot = conduit_telemetry::snapshot_from_lines(&lines);
        assert_eq!(snapshot.connected, 19);
        assert_eq!(snapshot.up_rate_display, "1.67 MB/s");
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let source = FileSource::new("/nonexistent/path/conduit.log", 200);
        let err = source.recent_lines().await.unwrap_err();
        assert!(err.to_string().contains("Read error"));
    }
}
