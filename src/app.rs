//! Dashboard state shared by all request handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use conduit_telemetry::{snapshot_from_lines, TelemetrySnapshot};
use tracing::warn;

use crate::access::AccessList;
use crate::actions::Action;
use crate::command::{self, CommandOutput};
use crate::config::Settings;
use crate::data::HostOverview;
use crate::source::LogSource;

const DEFAULT_UNIT: &str = "conduit.service";
const DEFAULT_SCRIPTS_DIR: &str = "/opt/khajubridge/scripts";
const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_ACTION_TIMEOUT: Duration = Duration::from_secs(120);

/// Whether the Conduit unit is running, as reported by systemd.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Active,
    Inactive,
}

impl ServiceState {
    /// Returns the label shown on the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            ServiceState::Active => "active",
            ServiceState::Inactive => "inactive",
        }
    }
}

/// Everything shown on the overview panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub host: HostOverview,
    pub telemetry: TelemetrySnapshot,
}

/// The dashboard: where data comes from and what it may do.
///
/// Holds no per-request state. Every call gathers fresh data, so a
/// `Dashboard` can be shared across connections behind an `Arc`.
#[derive(Debug)]
pub struct Dashboard {
    source: Arc<dyn LogSource>,
    access: AccessList,
    conduit_unit: String,
    scripts_dir: PathBuf,
    command_timeout: Duration,
    action_timeout: Duration,
}

impl Dashboard {
    /// Create a builder reading Conduit's log from `source`.
    pub fn builder(source: Arc<dyn LogSource>) -> DashboardBuilder {
        DashboardBuilder::new(source)
    }

    /// Build a dashboard from loaded settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::builder(settings.log_source()?)
            .access(settings.access_list())
            .conduit_unit(settings.conduit_unit.clone())
            .scripts_dir(settings.khajubridge_scripts.clone())
            .command_timeout(settings.command_timeout()?)
            .action_timeout(settings.action_timeout()?)
            .build())
    }

    /// Returns a description of the log source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// The network allow-list.
    pub fn access(&self) -> &AccessList {
        &self.access
    }

    /// Directory holding the maintenance scripts.
    pub fn scripts_dir(&self) -> &Path {
        &self.scripts_dir
    }

    /// Recent log lines, or an empty batch if retrieval failed.
    pub async fn recent_lines(&self) -> Vec<String> {
        match self.source.recent_lines().await {
            Ok(lines) => lines,
            Err(e) => {
                warn!("Unable to read {}: {}", self.source.description(), e);
                Vec::new()
            }
        }
    }

    /// Current traffic telemetry derived from the log tail.
    pub async fn telemetry(&self) -> TelemetrySnapshot {
        snapshot_from_lines(&self.recent_lines().await)
    }

    /// Host resources and traffic telemetry, gathered concurrently.
    pub async fn overview(&self) -> Overview {
        let (host, telemetry) = tokio::join!(HostOverview::collect(), self.telemetry());
        Overview { host, telemetry }
    }

    /// Raw log text for the log panel.
    ///
    /// On failure the error message is returned instead, so the operator
    /// sees why there are no logs.
    pub async fn logs_text(&self) -> String {
        match self.source.recent_lines().await {
            Ok(lines) => lines.join("\n"),
            Err(e) => e.to_string(),
        }
    }

    /// Ask systemd whether the Conduit unit is running.
    pub async fn service_state(&self) -> ServiceState {
        let result = command::run(
            "systemctl",
            &["is-active", self.conduit_unit.as_str()],
            self.command_timeout,
        )
        .await;
        if result.success() {
            ServiceState::Active
        } else {
            ServiceState::Inactive
        }
    }

    /// Run a maintenance script.
    pub async fn run_action(&self, action: Action) -> CommandOutput {
        action.run(&self.scripts_dir, self.action_timeout).await
    }
}

/// Builder for [`Dashboard`].
#[derive(Debug)]
pub struct DashboardBuilder {
    source: Arc<dyn LogSource>,
    access: Option<AccessList>,
    conduit_unit: Option<String>,
    scripts_dir: Option<PathBuf>,
    command_timeout: Option<Duration>,
    action_timeout: Option<Duration>,
}

impl DashboardBuilder {
    /// Create a new builder.
    pub fn new(source: Arc<dyn LogSource>) -> Self {
        Self {
            source,
            access: None,
            conduit_unit: None,
            scripts_dir: None,
            command_timeout: None,
            action_timeout: None,
        }
    }

    /// Set the network allow-list. Defaults to loopback only.
    pub fn access(mut self, access: AccessList) -> Self {
        self.access = Some(access);
        self
    }

    /// Set the systemd unit checked for liveness.
    pub fn conduit_unit(mut self, unit: impl Into<String>) -> Self {
        self.conduit_unit = Some(unit.into());
        self
    }

    /// Set the directory holding the maintenance scripts.
    pub fn scripts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scripts_dir = Some(dir.into());
        self
    }

    /// Set the timeout for systemctl calls.
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = Some(timeout);
        self
    }

    /// Set the timeout for maintenance scripts.
    pub fn action_timeout(mut self, timeout: Duration) -> Self {
        self.action_timeout = Some(timeout);
        self
    }

    /// Build the Dashboard.
    pub fn build(self) -> Dashboard {
        Dashboard {
            source: self.source,
            access: self.access.unwrap_or_default(),
            conduit_unit: self
                .conduit_unit
                .unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            scripts_dir: self
                .scripts_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SCRIPTS_DIR)),
            command_timeout: self.command_timeout.unwrap_or(DEFAULT_COMMAND_TIMEOUT),
            action_timeout: self.action_timeout.unwrap_or(DEFAULT_ACTION_TIMEOUT),
        }
    }
}
