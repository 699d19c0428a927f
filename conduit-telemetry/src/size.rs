//! Human-readable byte sizes and transfer rates.
//!
//! Conduit reports its cumulative totals as strings like `"950.0 MB"`. This
//! module turns those into byte counts and formats derived rates back into
//! strings like `"1.67 MB/s"`. Multiples are binary (1 KB = 1024 B).

const KB: f64 = 1024.0;
const MB: f64 = KB * 1024.0;
const GB: f64 = MB * 1024.0;
const TB: f64 = GB * 1024.0;

/// Unit suffix to byte multiplier, matched case-insensitively.
const UNITS: &[(&str, f64)] = &[("B", 1.0), ("KB", KB), ("MB", MB), ("GB", GB), ("TB", TB)];

/// Parse a size string like `"950.0 MB"` into a byte count.
///
/// The unit is case-insensitive and the space between number and unit is
/// optional. Anything that can't be understood (missing number, unknown
/// unit) yields `0.0`; this function never fails.
///
/// # Example
///
/// ```rust
/// use conduit_telemetry::parse_size;
///
/// assert_eq!(parse_size("1.0 GB"), 1024.0 * 1024.0 * 1024.0);
/// assert_eq!(parse_size("12 parsecs"), 0.0);
/// ```
pub fn parse_size(text: &str) -> f64 {
    split_size(text)
        .and_then(|(value, unit)| {
            UNITS
                .iter()
                .find(|(suffix, _)| suffix.eq_ignore_ascii_case(unit))
                .map(|(_, multiplier)| value * multiplier)
        })
        .unwrap_or(0.0)
}

/// Split `"<number> <unit>"` into its parts.
fn split_size(text: &str) -> Option<(f64, &str)> {
    let text = text.trim();
    let unit_start = text.find(|c: char| c.is_ascii_alphabetic())?;
    let value: f64 = text[..unit_start].trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    let unit = text[unit_start..].split_whitespace().next()?;
    Some((value, unit))
}

/// Format a rate in bytes per second for display.
///
/// Picks the largest unit the value reaches (GB/s, MB/s, KB/s, then B/s).
/// GB and MB use two decimals, KB one, B none. Negative and non-finite
/// input is shown as `0 B/s`.
///
/// # Example
///
/// ```rust
/// use conduit_telemetry::format_rate;
///
/// assert_eq!(format_rate(1024.0), "1.0 KB/s");
/// assert_eq!(format_rate(-5.0), "0 B/s");
/// ```
pub fn format_rate(bytes_per_second: f64) -> String {
    let bps = if bytes_per_second.is_finite() && bytes_per_second > 0.0 {
        bytes_per_second
    } else {
        0.0
    };

    if bps >= GB {
        format!("{:.2} GB/s", bps / GB)
    } else if bps >= MB {
        format!("{:.2} MB/s", bps / MB)
    } else if bps >= KB {
        format!("{:.1} KB/s", bps / KB)
    } else {
        format!("{:.0} B/s", bps)
    }
}
