//! # tvgate-runner
//!
//! Main entry point for the TradingView → Bitget order gateway.
//!
//! Resolves configuration once (optional JSON file + environment), builds the
//! Bitget trading module and the webhook pipeline, and serves `POST /tv`
//! until Ctrl+C.
//!
//! # Usage
//!
//! ```bash
//! TV_WEBHOOK_TOKEN=... BITGET_API_KEY=... tvgate-runner --config gateway.json --log-level info
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tvgate_core::Mode;
use tvgate_core::config::{DEFAULT_WEBHOOK_TOKEN, load_config};
use tvgate_core::logging::LogOptions;
use tvgate_td::bitget::BitgetTd;
use tvgate_webhook::{Pipeline, create_router};

/// TradingView webhook → Bitget futures order gateway.
#[derive(Parser)]
#[command(name = "tvgate-runner", about = "TradingView webhook to Bitget order gateway")]
struct Cli {
    /// Optional configuration file path (JSON). Environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Optional log directory for file output.
    #[arg(long)]
    log_dir: Option<String>,

    /// Emit console logs as JSON lines.
    #[arg(long)]
    log_json: bool,

    /// Listen address, overrides the configured one.
    #[arg(long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Initialize logging
    tvgate_core::logging::init_logging(&LogOptions {
        level: &cli.log_level,
        dir: cli.log_dir.as_deref(),
        file_prefix: "tvgate",
        json: cli.log_json,
    });

    // 2. Resolve configuration
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(listen) = cli.listen {
        config.listen_addr = listen;
    }

    info!(mode = %config.mode(), exchange = ?config.bitget, "tvgate-runner starting");
    if config.webhook_token == DEFAULT_WEBHOOK_TOKEN {
        warn!("webhook token is the default placeholder; set TV_WEBHOOK_TOKEN");
    }
    if !config.bitget.has_credentials() {
        warn!("Bitget credentials missing; order signals will be answered with 500");
    }
    if config.mode() == Mode::Live {
        warn!("LIVE trading enabled: orders will be sent to Bitget");
    }

    // 3. Build the trading module and the pipeline
    let gateway = Arc::new(BitgetTd::new(&config.bitget)?);
    let listen_addr = config.listen_addr.clone();
    let pipeline = Arc::new(Pipeline::new(Arc::new(config), gateway));
    let app = create_router(pipeline);

    // 4. Serve until Ctrl+C
    let listener =
        tokio::net::TcpListener::bind(&listen_addr).await.with_context(|| format!("failed to bind {listen_addr}"))?;
    info!("listening on {listen_addr} — POST /tv");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await.context("server error")?;

    info!("server stopped — goodbye");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
