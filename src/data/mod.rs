//! Data gathered for the dashboard besides the traffic telemetry.
//!
//! ## Submodules
//!
//! - [`duration`]: Parsing of duration strings (e.g., "10s", "500ms") and uptime formatting
//! - [`host`]: Uptime, CPU load and memory usage read from procfs ([`HostOverview`])
//!
//! Traffic telemetry itself lives in the `conduit-telemetry` crate; the
//! [`crate::app::Dashboard`] combines both for the overview.

pub mod duration;
pub mod host;

pub use host::HostOverview;
