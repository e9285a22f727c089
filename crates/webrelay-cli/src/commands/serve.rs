//! `webrelay serve` -- connect the chat transport and serve the relay.
//!
//! # Lifecycle
//!
//! ```text
//! 1. Load config (secret, IRC settings, listener address)
//! 2. Build the transport: IRC, or an in-memory one with --dry-run
//! 3. Start the transport in a background task
//! 4. Build the router; the relay route exists only with a secret
//! 5. Serve until Ctrl+C, then cancel the transport and wait for it
//! ```
//!
//! # Example
//!
//! ```text
//! webrelay serve
//! webrelay serve --config /etc/webrelay.json
//! webrelay serve --dry-run
//! ```

use std::sync::Arc;

use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use webrelay_channels::{Channel, ChatTransport, IrcTransport, MemoryTransport};
use webrelay_services::RelayService;
use webrelay_services::api::{ApiState, build_router};
use webrelay_types::config::Config;

use super::load_config;

/// Arguments for the `webrelay serve` subcommand.
#[derive(Args)]
pub struct ServeArgs {
    /// Config file path (overrides auto-discovery).
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log relayed lines instead of connecting to IRC.
    ///
    /// The configured `irc.channels` are treated as joined.
    #[arg(long)]
    pub dry_run: bool,
}

/// Pick the transport for this run.
pub fn build_transport(config: &Config, dry_run: bool) -> anyhow::Result<Arc<dyn Channel>> {
    if dry_run {
        info!(
            channels = ?config.irc.channels,
            "dry run: relayed lines are logged, not sent"
        );
        return Ok(Arc::new(MemoryTransport::with_channels(&config.irc.channels)));
    }
    if config.irc.server.is_empty() {
        anyhow::bail!("irc.server is not configured (set it, or run with --dry-run)");
    }
    Ok(Arc::new(IrcTransport::new(config.irc.clone())))
}

/// Run the serve command.
pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let channel = build_transport(&config, args.dry_run)?;
    let transport: Arc<dyn ChatTransport> = channel.clone();

    let relay = RelayService::from_config(&config.relay, transport.clone());
    if relay.is_none() {
        warn!("no relay secret configured; POST /relay is disabled");
    }

    let cancel = CancellationToken::new();
    let channel_handle = {
        let channel = channel.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = channel.start(cancel).await {
                error!(channel = channel.name(), error = %e, "transport stopped with error");
            }
        })
    };

    let app = build_router(ApiState::new(relay, transport));
    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {addr}: {e}"))?;
    info!(addr = %addr, transport = channel.name(), "webrelay listening -- press Ctrl+C to stop");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("received shutdown signal");
        })
        .await?;

    cancel.cancel();
    let _ = channel_handle.await;

    info!("webrelay shutdown complete");
    Ok(())
}
