//! Parsing of individual `[STATS]` log lines.
//!
//! Conduit periodically logs a line such as:
//!
//! ```text
//! 2026-01-31 05:33:39 [STATS] Connecting: 4 | Connected: 19 | Up: 950.0 MB | Down: 8.7 GB | Uptime: 2h
//! ```
//!
//! [`parse_line`] extracts a [`RawSample`] from such a line. The log format
//! is not owned by this crate, so parsing is best-effort: every field that
//! is missing or malformed falls back to its default instead of failing the
//! whole line.

use chrono::NaiveDateTime;

use crate::size::parse_size;

/// Tag that identifies a statistics line in the service log.
pub const STATS_MARKER: &str = "[STATS]";

/// Layout of the timestamp carried by the first two tokens of a line.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One structured reading extracted from a single log line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawSample {
    /// When the line was logged. `None` when the leading tokens are not a
    /// `YYYY-MM-DD HH:MM:SS` timestamp.
    pub timestamp: Option<NaiveDateTime>,

    /// Clients currently establishing a connection.
    pub connecting: u64,

    /// Clients currently connected.
    pub connected: u64,

    /// Cumulative upload total exactly as logged (e.g. `"950.0 MB"`).
    pub up_total_display: String,

    /// Cumulative download total exactly as logged.
    pub down_total_display: String,

    /// Cumulative upload total in bytes, `0.0` if the display string could
    /// not be parsed.
    pub up_total_bytes: f64,

    /// Cumulative download total in bytes.
    pub down_total_bytes: f64,
}

/// Returns true if `line` carries a statistics sample.
///
/// Recognition is a plain substring test for [`STATS_MARKER`].
pub fn is_sample(line: &str) -> bool {
    line.contains(STATS_MARKER)
}

/// Parse one log line into a [`RawSample`].
///
/// Never fails. Fields are separated by `|` and matched by label prefix, so
/// their order does not matter. If a label appears twice the last
/// well-formed value wins.
pub fn parse_line(line: &str) -> RawSample {
    let mut sample = RawSample {
        timestamp: parse_timestamp(line),
        ..RawSample::default()
    };

    let body = match line.find(STATS_MARKER) {
        Some(idx) => &line[idx + STATS_MARKER.len()..],
        None => line,
    };

    for field in body.split('|').map(str::trim) {
        if let Some(value) = field.strip_prefix("Connecting:") {
            if let Some(count) = parse_count(value) {
                sample.connecting = count;
            }
        } else if let Some(value) = field.strip_prefix("Connected:") {
            if let Some(count) = parse_count(value) {
                sample.connected = count;
            }
        } else if let Some(value) = field.strip_prefix("Up:") {
            sample.up_total_display = value.trim().to_string();
            sample.up_total_bytes = parse_size(value);
        } else if let Some(value) = field.strip_prefix("Down:") {
            sample.down_total_display = value.trim().to_string();
            sample.down_total_bytes = parse_size(value);
        }
    }

    sample
}

/// Join the first two whitespace-separated tokens and parse them as a
/// timestamp.
fn parse_timestamp(line: &str) -> Option<NaiveDateTime> {
    let mut tokens = line.split_whitespace();
    let date = tokens.next()?;
    let time = tokens.next()?;
    NaiveDateTime::parse_from_str(&format!("{} {}", date, time), TIMESTAMP_FORMAT).ok()
}

/// Parse the leading integer of a count field such as `" 19"`.
fn parse_count(value: &str) -> Option<u64> {
    value.split_whitespace().next()?.parse().ok()
}
