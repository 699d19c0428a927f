//! Dashboard configuration.
//!
//! Settings are layered with the `config` crate: built-in defaults, then an
//! optional config file, then environment variables. Environment variable
//! names are the upper-cased field names (`LISTEN_ADDR`, `CONDUIT_UNIT`,
//! `JOURNAL_TAIL`, ...), matching how the service is deployed with a systemd
//! `EnvironmentFile`.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::access::{AccessList, DEFAULT_ALLOW_CIDRS};
use crate::data::duration::parse_duration;
use crate::source::{FileSource, JournalSource, LogSource};

const DEFAULT_LISTEN_ADDR: &str = ":8080";
const DEFAULT_SCRIPTS_DIR: &str = "/opt/khajubridge/scripts";
const DEFAULT_CONDUIT_UNIT: &str = "conduit.service";
const DEFAULT_JOURNAL_TAIL: i64 = 200;
const DEFAULT_COMMAND_TIMEOUT: &str = "10s";
const DEFAULT_ACTION_TIMEOUT: &str = "120s";

/// Runtime settings of the dashboard.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Address to listen on. A bare `:port` listens on all interfaces.
    pub listen_addr: String,
    /// Directory holding the maintenance scripts.
    pub khajubridge_scripts: PathBuf,
    /// systemd unit of the Conduit service.
    pub conduit_unit: String,
    /// Number of journal lines to read per request.
    pub journal_tail: usize,
    /// Comma-separated CIDR ranges allowed to reach the dashboard.
    pub allow_cidrs: String,
    /// Read Conduit's log from this file instead of the journal.
    #[serde(default)]
    pub conduit_log_file: Option<PathBuf>,
    /// Limit for journal and systemctl calls, e.g. "10s".
    pub command_timeout: String,
    /// Limit for maintenance scripts, e.g. "120s".
    pub action_timeout: String,
}

impl Settings {
    /// Load settings from defaults, an optional file and the process
    /// environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(config_path, Environment::default())
    }

    /// Like [`Settings::load`] with an explicit environment source.
    pub fn load_with_env(config_path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("listen_addr", DEFAULT_LISTEN_ADDR)?
            .set_default("khajubridge_scripts", DEFAULT_SCRIPTS_DIR)?
            .set_default("conduit_unit", DEFAULT_CONDUIT_UNIT)?
            .set_default("journal_tail", DEFAULT_JOURNAL_TAIL)?
            .set_default("allow_cidrs", DEFAULT_ALLOW_CIDRS)?
            .set_default("command_timeout", DEFAULT_COMMAND_TIMEOUT)?
            .set_default("action_timeout", DEFAULT_ACTION_TIMEOUT)?;

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        }

        // An empty variable (`CONDUIT_LOG_FILE=`) means unset.
        let settings: Settings = builder
            .add_source(env.ignore_empty(true))
            .build()?
            .try_deserialize()
            .context("Invalid configuration")?;

        // Surface bad values at startup rather than on the first request.
        settings.listen_socket_addr()?;
        settings.command_timeout()?;
        settings.action_timeout()?;
        Ok(settings)
    }

    /// The listen address as a socket address.
    ///
    /// `":8080"` is accepted and means `0.0.0.0:8080`.
    pub fn listen_socket_addr(&self) -> Result<SocketAddr> {
        let addr = if self.listen_addr.starts_with(':') {
            format!("0.0.0.0{}", self.listen_addr)
        } else {
            self.listen_addr.clone()
        };
        addr.parse()
            .with_context(|| format!("Invalid listen address: {}", self.listen_addr))
    }

    /// Timeout for journal and systemctl calls.
    pub fn command_timeout(&self) -> Result<Duration> {
        parse_duration(&self.command_timeout).context("Invalid command_timeout")
    }

    /// Timeout for maintenance scripts.
    pub fn action_timeout(&self) -> Result<Duration> {
        parse_duration(&self.action_timeout).context("Invalid action_timeout")
    }

    /// The parsed allow-list.
    pub fn access_list(&self) -> AccessList {
        AccessList::parse(&self.allow_cidrs)
    }

    /// The log source these settings select.
    pub fn log_source(&self) -> Result<Arc<dyn LogSource>> {
        Ok(match &self.conduit_log_file {
            Some(path) => Arc::new(FileSource::new(path, self.journal_tail)),
            None => Arc::new(JournalSource::new(
                self.conduit_unit.clone(),
                self.journal_tail,
                self.command_timeout()?,
            )),
        })
    }
}
