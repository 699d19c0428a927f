//! Host resource readings from procfs.
//!
//! Each reader is split into an async `poll`-style function that reads the
//! file and a pure `proc_*_inner` function over its contents, so parsing can
//! be tested against fixed fixtures.

use std::time::Duration;

use tracing::warn;

use super::duration::format_uptime;

const BYTES_PER_KIBIBYTE: u64 = 1024;

/// Gap between the two `/proc/stat` readings used for CPU load.
pub const CPU_SAMPLE_INTERVAL: Duration = Duration::from_millis(250);

#[derive(thiserror::Error, Debug)]
/// Errors produced by functions in this module
pub enum Error {
    /// Wrapper for [`std::io::Error`]
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A procfs file did not have the expected shape
    #[error("procfs file malformed: {0}")]
    Malformed(&'static str),
    /// Unable to parse floating point
    #[error("Float Parsing: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),
    /// Unable to parse integer
    #[error("Integer Parsing: {0}")]
    ParseInt(#[from] std::num::ParseIntError),
}

/// Host resource usage shown on the overview.
#[derive(Debug, Clone, PartialEq)]
pub struct HostOverview {
    /// Uptime truncated to minutes, e.g. "26h5m0s".
    pub uptime: String,
    /// CPU busy percentage over [`CPU_SAMPLE_INTERVAL`].
    pub cpu_percent: f64,
    /// Memory in use (total minus available), MiB.
    pub mem_used_mib: u64,
    /// Total memory, MiB.
    pub mem_total_mib: u64,
}

impl HostOverview {
    /// Read uptime, CPU load and memory.
    ///
    /// Never fails: a reading that can't be taken is logged and shown as
    /// zero.
    pub async fn collect() -> Self {
        let uptime = match uptime().await {
            Ok(d) => format_uptime(d),
            Err(e) => {
                warn!("Unable to read uptime: {e}");
                format_uptime(Duration::ZERO)
            }
        };

        let cpu_percent = cpu_load_percent(CPU_SAMPLE_INTERVAL)
            .await
            .unwrap_or_else(|e| {
                warn!("Unable to read CPU load: {e}");
                0.0
            });

        let (mem_used_mib, mem_total_mib) = match meminfo().await {
            Ok(mem) => (mem.used_mib(), mem.total_mib()),
            Err(e) => {
                warn!("Unable to read memory usage: {e}");
                (0, 0)
            }
        };

        Self {
            uptime,
            cpu_percent,
            mem_used_mib,
            mem_total_mib,
        }
    }
}

/// Read `/proc/uptime`
pub async fn uptime() -> Result<Duration, Error> {
    let buf = tokio::fs::read_to_string("/proc/uptime").await?;
    proc_uptime_inner(&buf)
}

/// Only the first field is used, which is the total uptime in seconds.
fn proc_uptime_inner(contents: &str) -> Result<Duration, Error> {
    let first = contents
        .split_whitespace()
        .next()
        .ok_or(Error::Malformed("/proc/uptime empty"))?;
    let secs = first.parse::<f64>()?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(Error::Malformed("/proc/uptime out of range"));
    }
    Ok(Duration::from_secs_f64(secs))
}

/// Aggregate CPU counters from the `cpu` line of `/proc/stat`, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuTimes {
    /// idle + iowait
    pub idle: u64,
    /// user + nice + system + idle + iowait + irq + softirq + steal
    pub total: u64,
}

impl CpuTimes {
    /// Busy percentage between an earlier reading and this one.
    ///
    /// Returns 0.0 if no ticks elapsed.
    pub fn load_percent_since(&self, earlier: &CpuTimes) -> f64 {
        let total = self.total.saturating_sub(earlier.total);
        if total == 0 {
            return 0.0;
        }
        let idle = self.idle.saturating_sub(earlier.idle).min(total);
        (1.0 - idle as f64 / total as f64) * 100.0
    }
}

/// Read `/proc/stat` twice, `interval` apart, and compute CPU load.
pub async fn cpu_load_percent(interval: Duration) -> Result<f64, Error> {
    let before = cpu_times().await?;
    tokio::time::sleep(interval).await;
    let after = cpu_times().await?;
    Ok(after.load_percent_since(&before))
}

/// Read the aggregate counters from `/proc/stat`
pub async fn cpu_times() -> Result<CpuTimes, Error> {
    let buf = tokio::fs::read_to_string("/proc/stat").await?;
    proc_stat_inner(&buf)
}

fn proc_stat_inner(contents: &str) -> Result<CpuTimes, Error> {
    let line = contents
        .lines()
        .next()
        .ok_or(Error::Malformed("/proc/stat empty"))?;
    let mut fields = line.split_whitespace();
    if fields.next() != Some("cpu") {
        return Err(Error::Malformed("/proc/stat missing aggregate cpu line"));
    }

    // user nice system idle iowait irq softirq steal; guest time is already
    // folded into user and nice.
    let counters = fields
        .take(8)
        .map(str::parse::<u64>)
        .collect::<Result<Vec<u64>, _>>()?;
    if counters.len() < 4 {
        return Err(Error::Malformed("/proc/stat cpu line too short"));
    }

    let idle = counters[3] + counters.get(4).copied().unwrap_or(0);
    let total = counters.iter().sum();
    Ok(CpuTimes { idle, total })
}

/// Memory totals from `/proc/meminfo`, in KiB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemInfo {
    pub total_kib: u64,
    pub available_kib: u64,
}

impl MemInfo {
    /// Memory in use in MiB.
    pub fn used_mib(&self) -> u64 {
        self.total_kib.saturating_sub(self.available_kib) / BYTES_PER_KIBIBYTE
    }

    /// Total memory in MiB.
    pub fn total_mib(&self) -> u64 {
        self.total_kib / BYTES_PER_KIBIBYTE
    }
}

/// Read `/proc/meminfo`
pub async fn meminfo() -> Result<MemInfo, Error> {
    let buf = tokio::fs::read_to_string("/proc/meminfo").await?;
    proc_meminfo_inner(&buf)
}

fn proc_meminfo_inner(contents: &str) -> Result<MemInfo, Error> {
    let mut total_kib = None;
    let mut available_kib = None;

    for line in contents.lines() {
        if let Some(rest) = line.strip_prefix("MemTotal:") {
            total_kib = Some(parse_kib(rest)?);
        } else if let Some(rest) = line.strip_prefix("MemAvailable:") {
            available_kib = Some(parse_kib(rest)?);
        }
    }

    Ok(MemInfo {
        total_kib: total_kib.ok_or(Error::Malformed("/proc/meminfo missing MemTotal"))?,
        available_kib: available_kib
            .ok_or(Error::Malformed("/proc/meminfo missing MemAvailable"))?,
    })
}

/// Parse `"   16318480 kB"`.
fn parse_kib(rest: &str) -> Result<u64, Error> {
    let value = rest
        .split_whitespace()
        .next()
        .ok_or(Error::Malformed("/proc/meminfo empty value"))?;
    Ok(value.parse::<u64>()?)
}
