use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use conduit_console::{server, Dashboard, Settings};

#[derive(Parser, Debug)]
#[command(name = "conduit-console")]
#[command(about = "LAN-only status dashboard for the Conduit relay service")]
struct Args {
    /// Config file (TOML, YAML or JSON). Environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. ":8080" or "127.0.0.1:8080"
    #[arg(short, long)]
    listen: Option<String>,

    /// systemd unit of the Conduit service
    #[arg(short, long)]
    unit: Option<String>,

    /// Read Conduit's log from this file instead of the journal
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(listen) = args.listen {
        settings.listen_addr = listen;
    }
    if let Some(unit) = args.unit {
        settings.conduit_unit = unit;
    }
    if let Some(log_file) = args.log_file {
        settings.conduit_log_file = Some(log_file);
    }

    let addr = settings.listen_socket_addr()?;
    let dashboard = Arc::new(Dashboard::from_settings(&settings)?);

    server::serve(dashboard, addr).await
}
