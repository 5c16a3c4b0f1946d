//! Uniswap Trigger Bot — Entry Point
//!
//! Initializes configuration, logging, the blockchain connection,
//! and the price monitor. Runs until SIGINT/SIGTERM.
//!
//! Wiring sequence:
//! 1. Load config.toml + validate (env overrides applied)
//! 2. Init tracing (JSON structured logging)
//! 3. Load signing credentials from env vars (PRIVATE_KEY, ACCOUNT)
//! 4. Connect RPC provider + validate chain ID
//! 5. Parse contract addresses + validate deployed code
//! 6. Report wallet balances (startup sanity read)
//! 7. Spawn health/metrics server (/live, /ready, /metrics)
//! 8. Spawn PriceMonitor loop (interval ticks, one-shot trigger)
//! 9. Wait for SIGINT → graceful shutdown
//!
//! The process stays alive after the monitor halts (triggered or
//! aborted); the health server keeps serving until shutdown.

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

mod adapters;
mod config;
mod domain;
mod ports;
mod usecases;

use adapters::chain::{
    ChainCredentials, ContractAddresses, DryRunExecutor, ExchangeQuoteSource,
    ForwardingExecutor, RpcProvider, WalletBalances,
};
use adapters::metrics::{HealthServer, HealthState, MetricsRegistry};
use ports::trade_executor::TradeExecution;
use usecases::PriceMonitor;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration from config.toml ──────────────
    let config = config::loader::load_config("config.toml")
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(&config.bot.log_level)
                }),
        )
        .json()
        .init();

    info!(
        name = %config.bot.name,
        version = env!("CARGO_PKG_VERSION"),
        dry_run = config.bot.dry_run,
        sell_price = %config.trigger.sell_price,
        "Starting Uniswap Trigger Bot"
    );

    // ── 3. Shutdown signal channel ──────────────────────────
    let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);

    // ── 4. Load signing credentials from env vars ───────────
    let credentials =
        ChainCredentials::from_env().context("Failed to load chain credentials from env")?;

    // ── 5. Connect RPC provider (validates chain ID) ────────
    let provider = Arc::new(
        RpcProvider::connect(&config.api, credentials.wallet())
            .await
            .context("Failed to connect RPC provider")?,
    );

    // ── 6. Parse + validate contract addresses ──────────────
    let addresses = ContractAddresses::from_config(&config.contracts)?;
    addresses
        .validate_deployed(&provider)
        .await
        .context("Contract validation failed")?;

    // ── 7. Report wallet balances ───────────────────────────
    let balances = WalletBalances::new(
        Arc::clone(&provider),
        addresses.dai,
        credentials.account(),
    );
    if let Err(e) = balances.report().await {
        warn!(error = %e, "Balance report failed — continuing anyway");
    }

    // ── 8. Metrics registry + health server ─────────────────
    let metrics = Arc::new(MetricsRegistry::new().context("Failed to register metrics")?);
    let health_state = Arc::new(HealthState::new());

    let health_handle = if config.metrics.enabled {
        let server = HealthServer::new(
            Arc::clone(&health_state),
            Arc::clone(&metrics),
            config.metrics.health_port,
        );
        let health_shutdown = shutdown_tx.subscribe();
        Some(tokio::spawn(async move {
            if let Err(e) = server.run(health_shutdown).await {
                error!(error = %e, "Health server failed");
            }
        }))
    } else {
        None
    };

    // ── 9. Wire ports and spawn the price monitor ───────────
    let quote_source = Arc::new(ExchangeQuoteSource::new(
        Arc::clone(&provider),
        addresses.exchange,
    ));

    let executor: Arc<dyn TradeExecution> = if config.bot.dry_run {
        warn!("Dry-run mode — triggers logged but NO transaction submitted");
        Arc::new(DryRunExecutor::new(config.trigger.slippage_bps))
    } else {
        Arc::new(ForwardingExecutor::new(
            Arc::clone(&provider),
            addresses.exchange,
            addresses.forwarder,
            credentials.account(),
            &config.gas,
            config.trigger.slippage_bps,
        ))
    };

    let monitor = Arc::new(
        PriceMonitor::new(quote_source, executor, Arc::clone(&metrics), &config.trigger)
            .context("Failed to build price monitor")?,
    );

    let monitor_shutdown = shutdown_tx.subscribe();
    let monitor_ref = Arc::clone(&monitor);
    let monitor_handle = tokio::spawn(async move {
        if let Err(e) = monitor_ref.run(monitor_shutdown).await {
            error!(error = %e, "Price monitor failed");
        }
    });

    info!("All tasks spawned — bot is running");

    // ── 10. Wait for SIGINT ─────────────────────────────────
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("SIGINT received, initiating graceful shutdown");
        }
    }

    // ── Graceful shutdown ───────────────────────────────────

    // 1. Signal all tasks to stop
    let _ = shutdown_tx.send(());
    info!("Shutdown signal broadcast to all tasks");

    // 2. Mark readiness probe unhealthy (503)
    health_state.chain_healthy.store(false, Ordering::Relaxed);

    // 3. Wait for the monitor to finish (up to 10s)
    let _ = tokio::time::timeout(std::time::Duration::from_secs(10), monitor_handle).await;

    // 4. Stop health server
    if let Some(handle) = health_handle {
        handle.abort();
    }

    info!("Shutdown complete");
    Ok(())
}
