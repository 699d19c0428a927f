//! # conduit-console
//!
//! A LAN-only status dashboard for a host running the Conduit relay.
//!
//! The dashboard shows whether the Conduit service is up, host resources,
//! and traffic telemetry derived from the `[STATS]` lines Conduit writes to
//! its log. It can also trigger the KhajuBridge maintenance scripts.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          server                              │
//! │  ┌─────────┐    ┌───────────┐    ┌───────────────────────┐   │
//! │  │ access  │───▶│    app    │───▶│ ui (page, fragments)  │   │
//! │  │ (CIDRs) │    │(Dashboard)│    └───────────────────────┘   │
//! │  └─────────┘    └─────┬─────┘                                │
//! │          ┌────────────┼────────────┬─────────────┐           │
//! │          ▼            ▼            ▼             ▼           │
//! │     ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────┐       │
//! │     │ source  │  │  data   │  │ command │  │ actions │       │
//! │     │ (logs)  │  │ (host)  │  │(systemd)│  │(scripts)│       │
//! │     └────┬────┘  └─────────┘  └─────────┘  └─────────┘       │
//! │          ▼                                                   │
//! │   conduit-telemetry: lines → samples → snapshot              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: Log retrieval ([`LogSource`] trait) from the systemd
//!   journal or a plain file
//! - **[`data`]**: Host uptime, CPU and memory read from procfs
//! - **[`app`]**: The [`Dashboard`], combining sources into what is shown
//! - **[`ui`]**: HTML page and fragments
//! - **[`server`]**: hyper HTTP server and routing
//! - **[`access`]**: CIDR allow-list checked on every request
//! - **[`actions`]**: Privileged maintenance scripts
//! - **[`config`]**: Layered settings (defaults, file, environment)
//!
//! ## Usage
//!
//! ### As a service
//!
//! ```bash
//! # Read Conduit's journal, listen on all interfaces
//! conduit-console
//!
//! # Development: read a log file instead of the journal
//! conduit-console --log-file ./conduit.log --listen 127.0.0.1:8080
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use std::sync::Arc;
//! use conduit_console::{Dashboard, FileSource};
//!
//! # tokio_test::block_on(async {
//! let source = Arc::new(FileSource::new("/var/log/conduit.log", 200));
//! let dashboard = Dashboard::builder(source).build();
//!
//! let telemetry = dashboard.telemetry().await;
//! println!("{} users, {} up", telemetry.connected, telemetry.up_rate_display);
//! # });
//! ```

pub mod access;
pub mod actions;
pub mod app;
pub mod command;
pub mod config;
pub mod data;
pub mod server;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use access::{AccessList, Cidr};
pub use actions::Action;
pub use app::{Dashboard, Overview, ServiceState};
pub use config::Settings;
pub use data::HostOverview;
pub use source::{FileSource, JournalSource, LogSource, SourceError};

pub use conduit_telemetry::TelemetrySnapshot;
