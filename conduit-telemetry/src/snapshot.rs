//! Rate derivation - turns samples into a display-ready snapshot.

use crate::sample::RawSample;
use crate::size::format_rate;

/// Display value used when a total or rate cannot be determined.
pub const UNKNOWN: &str = "-";

/// Elapsed time substituted when two samples are not strictly ordered in
/// time (identical, skewed or missing timestamps).
const FALLBACK_ELAPSED_SECS: f64 = 1.0;

/// Telemetry for one dashboard refresh.
///
/// Counts and totals come from the newest sample. Rates are derived from
/// the two newest samples and are [`UNKNOWN`] when fewer than two were
/// available.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TelemetrySnapshot {
    /// Clients establishing a connection.
    pub connecting: u64,

    /// Clients connected.
    pub connected: u64,

    /// Cumulative upload total as logged, or [`UNKNOWN`].
    pub up_total_display: String,

    /// Cumulative download total as logged, or [`UNKNOWN`].
    pub down_total_display: String,

    /// Upload rate such as `"1.67 MB/s"`, or [`UNKNOWN`].
    pub up_rate_display: String,

    /// Download rate, or [`UNKNOWN`].
    pub down_rate_display: String,
}

impl TelemetrySnapshot {
    /// Snapshot for when no sample was found at all.
    ///
    /// Distinct from a zero-traffic snapshot: every display field is
    /// [`UNKNOWN`].
    pub fn unknown() -> Self {
        Self {
            connecting: 0,
            connected: 0,
            up_total_display: UNKNOWN.to_string(),
            down_total_display: UNKNOWN.to_string(),
            up_rate_display: UNKNOWN.to_string(),
            down_rate_display: UNKNOWN.to_string(),
        }
    }

    /// Returns true if throughput could be derived for this snapshot.
    pub fn has_rates(&self) -> bool {
        self.up_rate_display != UNKNOWN && self.down_rate_display != UNKNOWN
    }
}

impl Default for TelemetrySnapshot {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Derive a snapshot from samples ordered oldest to newest.
///
/// Only the last two samples are used. With two samples the rate is the
/// difference of the cumulative totals over the elapsed time, clamped at
/// zero so a counter reset (service restart) shows `0 B/s` rather than a
/// negative rate.
pub fn derive(samples: &[RawSample]) -> TelemetrySnapshot {
    match samples {
        [] => TelemetrySnapshot::unknown(),
        [only] => TelemetrySnapshot {
            up_rate_display: UNKNOWN.to_string(),
            down_rate_display: UNKNOWN.to_string(),
            ..from_latest(only)
        },
        [.., older, newer] => {
            let dt = elapsed_secs(older, newer);
            let up_rate = (newer.up_total_bytes - older.up_total_bytes) / dt;
            let down_rate = (newer.down_total_bytes - older.down_total_bytes) / dt;

            TelemetrySnapshot {
                up_rate_display: format_rate(up_rate.max(0.0)),
                down_rate_display: format_rate(down_rate.max(0.0)),
                ..from_latest(newer)
            }
        }
    }
}

/// Counts and totals of `sample`, rates left unknown.
fn from_latest(sample: &RawSample) -> TelemetrySnapshot {
    TelemetrySnapshot {
        connecting: sample.connecting,
        connected: sample.connected,
        up_total_display: sample.up_total_display.clone(),
        down_total_display: sample.down_total_display.clone(),
        up_rate_display: UNKNOWN.to_string(),
        down_rate_display: UNKNOWN.to_string(),
    }
}

/// Seconds between two samples, never zero or negative.
fn elapsed_secs(older: &RawSample, newer: &RawSample) -> f64 {
    let dt = match (older.timestamp, newer.timestamp) {
        (Some(then), Some(now)) => (now - then).num_milliseconds() as f64 / 1000.0,
        _ => 0.0,
    };
    if dt > 0.0 {
        dt
    } else {
        FALLBACK_ELAPSED_SECS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::parse_line;
    use chrono::NaiveDate;

    const MB: f64 = 1024.0 * 1024.0;

    fn sample_at(secs: u32, up: f64, down: f64) -> RawSample {
        RawSample {
            timestamp: NaiveDate::from_ymd_opt(2026, 1, 31)
                .unwrap()
                .and_hms_opt(5, 33, 0)
                .map(|t| t + chrono::Duration::seconds(i64::from(secs))),
            connecting: 1,
            connected: 2,
            up_total_display: format!("{} B", up),
            down_total_display: format!("{} B", down),
            up_total_bytes: up,
            down_total_bytes: down,
        }
    }

    #[test]
    fn test_zero_samples() {
        let snapshot = derive(&[]);
        assert_eq!(snapshot.connecting, 0);
        assert_eq!(snapshot.connected, 0);
        assert_eq!(snapshot.up_total_display, "-");
        assert_eq!(snapshot.down_total_display, "-");
        assert_eq!(snapshot.up_rate_display, "-");
        assert_eq!(snapshot.down_rate_display, "-");
        assert!(!snapshot.has_rates());
        assert_eq!(snapshot, TelemetrySnapshot::default());
    }

    #[test]
    fn test_one_sample() {
        let sample = parse_line(
            "2026-01-31 05:33:39 [STATS] Connecting: 4 | Connected: 19 | Up: 950.0 MB | Down: 8.7 GB",
        );
        let snapshot = derive(&[sample]);
        assert_eq!(snapshot.connecting, 4);
        assert_eq!(snapshot.connected, 19);
        assert_eq!(snapshot.up_total_display, "950.0 MB");
        assert_eq!(snapshot.down_total_display, "8.7 GB");
        assert_eq!(snapshot.up_rate_display, "-");
        assert_eq!(snapshot.down_rate_display, "-");
        assert!(!snapshot.has_rates());
    }

    #[test]
    fn test_two_samples_rate() {
        let older = sample_at(0, 0.0, 0.0);
        let newer = sample_at(10, 10.0 * 1024.0, 20.0 * MB);
        let snapshot = derive(&[older, newer]);
        assert_eq!(snapshot.up_rate_display, "1.0 KB/s");
        assert_eq!(snapshot.down_rate_display, "2.00 MB/s");
        assert!(snapshot.has_rates());
    }

    #[test]
    fn test_counter_reset_is_zero_rate() {
        let older = sample_at(0, 900.0 * MB, 8000.0 * MB);
        let newer = sample_at(30, 1.0 * MB, 2.0 * MB);
        let snapshot = derive(&[older, newer]);
        assert_eq!(snapshot.up_rate_display, "0 B/s");
        assert_eq!(snapshot.down_rate_display, "0 B/s");
        assert_eq!(snapshot.up_total_display, format!("{} B", 1.0 * MB));
    }

    #[test]
    fn test_identical_timestamps_use_one_second() {
        let older = sample_at(5, 0.0, 0.0);
        let newer = sample_at(5, 2048.0, 512.0);
        let snapshot = derive(&[older, newer]);
        assert_eq!(snapshot.up_rate_display, "2.0 KB/s");
        assert_eq!(snapshot.down_rate_display, "512 B/s");
    }

    #[test]
    fn test_backwards_clock_uses_one_second() {
        let older = sample_at(30, 0.0, 0.0);
        let newer = sample_at(0, 2048.0, 0.0);
        let snapshot = derive(&[older, newer]);
        assert_eq!(snapshot.up_rate_display, "2.0 KB/s");
        assert_eq!(snapshot.down_rate_display, "0 B/s");
    }

    #[test]
    fn test_missing_timestamp_uses_one_second() {
        let mut older = sample_at(0, 0.0, 0.0);
        older.timestamp = None;
        let newer = sample_at(30, 1024.0, 0.0);
        assert_eq!(derive(&[older.clone(), newer.clone()]).up_rate_display, "1.0 KB/s");

        let mut newer = newer;
        newer.timestamp = None;
        older.timestamp = None;
        assert_eq!(derive(&[older, newer]).up_rate_display, "1.0 KB/s");
    }

    #[test]
    fn test_only_last_two_samples_used() {
        let ancient = sample_at(0, 0.0, 0.0);
        let older = sample_at(100, 1000.0 * MB, 0.0);
        let newer = sample_at(110, 1000.0 * MB + 10.0 * 1024.0, 0.0);
        let snapshot = derive(&[ancient, older, newer]);
        assert_eq!(snapshot.up_rate_display, "1.0 KB/s");
    }
}
