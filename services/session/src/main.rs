//! C-Gate bridge binary.
//!
//! Connects to a gateway's status and command ports, logs every decoded
//! status command, and keeps the level cache warm for outbound callers.

use cgate_session::{CGateSession, SessionConfig};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "cgate-bridge")]
#[command(about = "C-Gate protocol bridge: decodes status lines, issues commands")]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "cgate.toml")]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let config = if args.config.exists() {
        let config = SessionConfig::from_file(&args.config)?;
        info!(path = %args.config.display(), "configuration loaded");
        config
    } else {
        info!(path = %args.config.display(), "no config file, using defaults");
        SessionConfig::default()
    };

    let session = Arc::new(CGateSession::new(config));
    let (events_tx, mut events_rx) = mpsc::channel(256);

    let status_session = Arc::clone(&session);
    let mut status_task =
        tokio::spawn(async move { status_session.run_status(events_tx).await });
    let command_task = tokio::spawn(Arc::clone(&session).run_command());

    loop {
        tokio::select! {
            Some(command) = events_rx.recv() => info!(%command, "gateway status"),
            result = &mut status_task => {
                if let Ok(Err(err)) = result {
                    error!(%err, "status loop terminated");
                }
                break;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    command_task.abort();
    status_task.abort();
    Ok(())
}
