//! Selection of the most recent samples from a batch of log lines.

use crate::sample::{is_sample, parse_line, RawSample};

/// Number of samples needed to derive a rate.
pub const DEFAULT_SAMPLE_COUNT: usize = 2;

/// Pick the newest `max_count` samples from `lines`, oldest first.
///
/// `lines` is expected in log order (oldest first, newest appended last).
/// The batch is scanned from the end so only the tail is parsed; lines
/// without the stats marker are skipped. If fewer than `max_count` samples
/// exist, all of them are returned.
///
/// # Example
///
/// ```rust
/// use conduit_telemetry::select_samples;
///
/// let lines = [
///     "2026-01-31 05:33:09 [STATS] Connected: 1",
///     "2026-01-31 05:33:20 [INFO] unrelated",
///     "2026-01-31 05:33:39 [STATS] Connected: 2",
/// ];
/// let samples = select_samples(&lines, 2);
/// assert_eq!(samples[0].connected, 1);
/// assert_eq!(samples[1].connected, 2);
/// ```
pub fn select_samples<S: AsRef<str>>(lines: &[S], max_count: usize) -> Vec<RawSample> {
    let mut samples: Vec<RawSample> = lines
        .iter()
        .rev()
        .map(|line| line.as_ref())
        .filter(|line| is_sample(line))
        .take(max_count)
        .map(parse_line)
        .collect();

    // Collected newest first.
    samples.reverse();
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(ts: &str, connected: u64) -> String {
        format!("{} [STATS] Connected: {}", ts, connected)
    }

    #[test]
    fn test_empty_batch() {
        let lines: [&str; 0] = [];
        assert!(select_samples(&lines, DEFAULT_SAMPLE_COUNT).is_empty());
    }

    #[test]
    fn test_no_samples_in_batch() {
        let lines = ["-- No entries --", "2026-01-31 05:33:09 [INFO] started"];
        assert!(select_samples(&lines, DEFAULT_SAMPLE_COUNT).is_empty());
    }

    #[test]
    fn test_single_sample() {
        let lines = vec!["noise".to_string(), stats("2026-01-31 05:33:09", 7)];
        let samples = select_samples(&lines, DEFAULT_SAMPLE_COUNT);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].connected, 7);
    }

    #[test]
    fn test_result_is_oldest_first() {
        let lines = vec![
            stats("2026-01-31 05:32:39", 1),
            "noise".to_string(),
            stats("2026-01-31 05:33:09", 2),
            "more noise".to_string(),
            stats("2026-01-31 05:33:39", 3),
            "trailing noise".to_string(),
        ];
        let samples = select_samples(&lines, DEFAULT_SAMPLE_COUNT);
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].connected, 2);
        assert_eq!(samples[1].connected, 3);
        assert!(samples[0].timestamp < samples[1].timestamp);
    }

    #[test]
    fn test_max_count_respected() {
        let lines: Vec<String> = (0..10)
            .map(|i| stats(&format!("2026-01-31 05:33:{:02}", i), i))
            .collect();

        let samples = select_samples(&lines, 4);
        let connected: Vec<u64> = samples.iter().map(|s| s.connected).collect();
        assert_eq!(connected, vec![6, 7, 8, 9]);

        assert!(select_samples(&lines, 0).is_empty());
    }
}
