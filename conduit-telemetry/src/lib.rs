//! # conduit-telemetry
//!
//! Traffic telemetry for the Conduit relay service, extracted from its log
//! output. Conduit writes a `[STATS]` line every few seconds carrying
//! connection counts and cumulative byte totals; this crate turns a batch
//! of such lines into a display-ready [`TelemetrySnapshot`] with derived
//! upload and download rates.
//!
//! ## Pipeline
//!
//! ```text
//! log lines ──▶ select_samples() ──▶ [RawSample; ≤2] ──▶ derive() ──▶ TelemetrySnapshot
//!                     │
//!                     └── parse_line() ── parse_size()
//! ```
//!
//! - [`size`]: byte size strings to numbers and rates back to strings
//! - [`sample`]: one log line to one [`RawSample`]
//! - [`select`]: the newest samples of a batch, oldest first
//! - [`snapshot`]: rate derivation and the [`TelemetrySnapshot`] type
//!
//! Everything here is pure: no I/O, no shared state. Malformed input never
//! produces an error; it degrades to `0` or `"-"` so a dashboard always has
//! something to show.
//!
//! ## Features
//!
//! - `serde`: `Serialize`/`Deserialize` for [`TelemetrySnapshot`]
//!
//! ## Example
//!
//! ```rust
//! use conduit_telemetry::snapshot_from_lines;
//!
//! let lines = [
//!     "2026-01-31 05:33:09 [STATS] Connecting: 2 | Connected: 15 | Up: 900.0 MB | Down: 8.0 GB",
//!     "2026-01-31 05:33:39 [STATS] Connecting: 4 | Connected: 19 | Up: 950.0 MB | Down: 8.7 GB",
//! ];
//!
//! let snapshot = snapshot_from_lines(&lines);
//! assert_eq!(snapshot.connected, 19);
//! assert_eq!(snapshot.up_rate_display, "1.67 MB/s");
//! ```

pub mod sample;
pub mod select;
pub mod size;
pub mod snapshot;

pub use sample::{is_sample, parse_line, RawSample, STATS_MARKER};
pub use select::{select_samples, DEFAULT_SAMPLE_COUNT};
pub use size::{format_rate, parse_size};
pub use snapshot::{derive, TelemetrySnapshot, UNKNOWN};

/// Build a snapshot from a batch of raw log lines (oldest first).
///
/// Equivalent to [`derive`] over the two newest samples found by
/// [`select_samples`]. An empty batch, or one without any `[STATS]` line,
/// yields [`TelemetrySnapshot::unknown`].
pub fn snapshot_from_lines<S: AsRef<str>>(lines: &[S]) -> TelemetrySnapshot {
    derive(&select_samples(lines, DEFAULT_SAMPLE_COUNT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end() {
        let lines = vec![
            "-- Logs begin at Sat 2026-01-31 05:00:00 UTC. --".to_string(),
            "2026-01-31 05:33:09 [STATS] Connecting: 2 | Connected: 15 | Up: 900.0 MB | Down: 8.0 GB | Uptime: 1h".to_string(),
            "2026-01-31 05:33:20 [INFO] accepted client".to_string(),
            "2026-01-31 05:33:39 [STATS] Connecting: 4 | Connected: 19 | Up: 950.0 MB | Down: 8.7 GB | Uptime: 1h".to_string(),
        ];

        let snapshot = snapshot_from_lines(&lines);
        assert_eq!(snapshot.connecting, 4);
        assert_eq!(snapshot.connected, 19);
        assert_eq!(snapshot.up_total_display, "950.0 MB");
        assert_eq!(snapshot.down_total_display, "8.7 GB");
        assert_eq!(snapshot.up_rate_display, "1.67 MB/s");
        assert_eq!(snapshot.down_rate_display, "23.89 MB/s");
    }

    #[test]
    fn test_no_stats_lines() {
        let lines = ["sudo: a password is required"];
        assert_eq!(snapshot_from_lines(&lines), TelemetrySnapshot::unknown());
    }

    #[test]
    fn test_idempotent() {
        let lines = [
            "2026-01-31 05:33:09 [STATS] Connected: 1 | Up: 1 KB | Down: 1 KB",
            "2026-01-31 05:33:19 [STATS] Connected: 2 | Up: 11 KB | Down: 1 KB",
        ];
        let first = snapshot_from_lines(&lines);
        let second = snapshot_from_lines(&lines);
        assert_eq!(first, second);
        assert_eq!(first.up_rate_display, "1.0 KB/s");
        assert_eq!(first.down_rate_display, "0 B/s");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_snapshot_serializes() {
        let snapshot = TelemetrySnapshot::unknown();
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["up_rate_display"], "-");
        assert_eq!(json["connected"], 0);
    }
}
