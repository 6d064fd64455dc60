//! DEXARB: cross-venue swap-quote arbitrage scanner
//!
//! Entry point. Loads configuration, initialises structured logging,
//! wires the quote source, scan engine and execution gateway, and runs
//! the scan loop until Ctrl+C.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use dexarb::config::AppConfig;
use dexarb::engine::executor::ExecutionGateway;
use dexarb::engine::scan_loop::{LogReporter, ScanLoop};
use dexarb::engine::scanner::ScanEngine;
use dexarb::ledger::{LedgerClient, SolanaLedger};
use dexarb::quotes::jupiter::JupiterClient;
use dexarb::wallet;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    init_logging();

    let cfg = AppConfig::load().context("Invalid configuration")?;

    info!(
        pair = %cfg.scan.pair.label,
        trade_amount = cfg.scan.trade_amount,
        profit_threshold = %cfg.scan.profit_threshold,
        slippage_limit = %cfg.scan.slippage_limit,
        venues = ?cfg.scan.venues,
        jupiter = %cfg.jupiter_url,
        "DEXARB starting up"
    );

    // -- Initialise components -------------------------------------------

    let quotes = JupiterClient::new(&cfg.jupiter_url, cfg.http_timeout)?;

    let keypair = wallet::load_keypair(cfg.keypair_path.as_deref())?;
    let ledger: Arc<dyn LedgerClient> = Arc::new(SolanaLedger::new(&cfg.rpc_url));
    let gateway = ExecutionGateway::new(keypair, Some(ledger));

    match gateway.signer() {
        Some(pubkey) => info!(%pubkey, "Execution gateway ready; executable routes are reported, not auto-executed"),
        None => warn!("No signing key, running in detection-only mode"),
    }

    let engine = ScanEngine::new(Arc::new(quotes), cfg.scan.clone());
    let scan_loop = ScanLoop::new(engine);

    // -- Main loop -------------------------------------------------------

    info!(
        interval_ms = scan_loop.interval().as_millis() as u64,
        "Entering main loop. Press Ctrl+C to stop."
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C; stopping");
        }
    };

    let mut reporter = LogReporter;
    let cycles = scan_loop.run(&mut reporter, shutdown).await;

    info!(cycles, "DEXARB shut down cleanly.");
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("dexarb=info"));

    let json_logging = std::env::var("DEXARB_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
