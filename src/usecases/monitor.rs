//! Price Monitor - Trigger-and-Halt Polling Loop
//!
//! The core use case: once per interval, read the current quote and
//! compare it to the sell threshold. The first quote at or below the
//! threshold triggers exactly one swap submission, after which the
//! monitor halts permanently. The monitor also halts on any quote or
//! submission error; nothing restarts it within the process.
//!
//! Two flags owned by this struct form the whole state machine:
//! - `in_flight` guards against overlapping checks when a slow
//!   external call outlives the polling period.
//! - `stopped` latches the terminal state; it is set at most once.
//!
//! Both are relaxed atomics: ticks run on a single cooperative task,
//! so the guard needs visibility, not compare-and-swap.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use alloy::primitives::U256;
use anyhow::Result;
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use tokio::sync::broadcast;
use tracing::{debug, error, info, instrument};

use crate::adapters::metrics::MetricsRegistry;
use crate::config::TriggerConfig;
use crate::domain::price::to_wei;
use crate::ports::quote_source::QuoteSource;
use crate::ports::trade_executor::{TradeExecution, TxId};

/// Fixed probe amount for price queries: one whole input unit in wei.
const QUOTE_PROBE_WEI: u128 = 1_000_000_000_000_000_000;

/// What a single tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// A previous check was still in flight; nothing was done.
    Skipped,
    /// Monitoring has already halted; nothing was done.
    Halted,
    /// Quote read, threshold not crossed; polling continues.
    NotTriggered,
    /// Trade submitted; monitoring is permanently halted.
    Triggered(TxId),
    /// Quote or submission failed; monitoring is permanently halted.
    Aborted,
}

/// Periodic price monitor with one-shot trade execution.
pub struct PriceMonitor {
    /// Read-only price queries.
    quote_source: Arc<dyn QuoteSource>,
    /// Swap construction and submission.
    executor: Arc<dyn TradeExecution>,
    /// Exported observability counters.
    metrics: Arc<MetricsRegistry>,
    /// Sell threshold; fixed at construction, never mutated.
    sell_price: Decimal,
    /// Amount swapped on trigger, in wei.
    input_amount_wei: U256,
    /// Seconds between checks.
    poll_interval: Duration,
    /// True while a check/trade sequence is active.
    in_flight: AtomicBool,
    /// True once the monitor has reached a terminal state.
    stopped: AtomicBool,
}

impl PriceMonitor {
    /// Build a monitor from the trigger configuration.
    pub fn new(
        quote_source: Arc<dyn QuoteSource>,
        executor: Arc<dyn TradeExecution>,
        metrics: Arc<MetricsRegistry>,
        trigger: &TriggerConfig,
    ) -> Result<Self> {
        let input_amount_wei = U256::from(to_wei(trigger.eth_amount)?);

        Ok(Self {
            quote_source,
            executor,
            metrics,
            sell_price: trigger.sell_price,
            input_amount_wei,
            poll_interval: Duration::from_secs(trigger.poll_interval_secs),
            in_flight: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
        })
    }

    /// Whether the monitor has reached its terminal state.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    /// Whether a check/trade sequence is currently active.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Run one price check.
    ///
    /// Exactly one external read per completed tick, and at most one
    /// external write over the monitor's lifetime. The `in_flight`
    /// guard is cleared on every exit path; `stopped` latches on
    /// trigger or error and is never cleared.
    #[instrument(skip(self), name = "price_tick")]
    pub async fn tick(&self) -> TickOutcome {
        if self.in_flight.load(Ordering::Relaxed) {
            self.metrics.ticks_skipped.inc();
            debug!("Previous check still in flight, skipping tick");
            return TickOutcome::Skipped;
        }
        // Defensive: the run loop exits on halt, so this only fires if
        // tick() is driven externally after a terminal outcome.
        if self.stopped.load(Ordering::Relaxed) {
            return TickOutcome::Halted;
        }

        self.in_flight.store(true, Ordering::Relaxed);
        self.metrics.ticks_total.inc();
        debug!("Checking price");

        let outcome = match self.quote_source.quote(U256::from(QUOTE_PROBE_WEI)).await {
            Ok(quote) => {
                self.metrics
                    .quote_price
                    .set(quote.price.to_f64().unwrap_or(0.0));
                info!(price = %quote, threshold = %self.sell_price, "Quote received");

                if quote.at_or_below(self.sell_price) {
                    info!("Threshold crossed, executing trade");
                    match self
                        .executor
                        .execute_trade(self.input_amount_wei, &quote)
                        .await
                    {
                        Ok(tx) => {
                            self.halt();
                            self.metrics.trades_submitted.inc();
                            TickOutcome::Triggered(tx)
                        }
                        Err(e) => {
                            error!(error = %e, "Trade submission failed — monitoring aborted");
                            self.halt();
                            TickOutcome::Aborted
                        }
                    }
                } else {
                    TickOutcome::NotTriggered
                }
            }
            Err(e) => {
                error!(error = %e, "Quote fetch failed — monitoring aborted");
                self.halt();
                TickOutcome::Aborted
            }
        };

        self.in_flight.store(false, Ordering::Relaxed);
        outcome
    }

    /// Drive ticks on the polling interval until a terminal outcome
    /// or a shutdown signal.
    ///
    /// The first check fires one full period after start. Dropping
    /// the interval on exit is the single timer cancellation.
    #[instrument(skip(self, shutdown_rx), name = "monitor_loop")]
    pub async fn run(&self, mut shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
        let start = tokio::time::Instant::now() + self.poll_interval;
        let mut ticker = tokio::time::interval_at(start, self.poll_interval);

        info!(
            interval_secs = self.poll_interval.as_secs(),
            threshold = %self.sell_price,
            "Price monitor started"
        );

        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => {
                    info!("Monitor received shutdown signal");
                    break;
                }
                _ = ticker.tick() => {
                    match self.tick().await {
                        TickOutcome::Triggered(tx) => {
                            info!(tx = %tx, "Trade submitted — monitoring complete");
                            break;
                        }
                        TickOutcome::Aborted => break,
                        _ => {}
                    }
                }
            }
        }

        Ok(())
    }

    fn halt(&self) {
        self.stopped.store(true, Ordering::Relaxed);
        self.metrics.monitor_halted.set(1.0);
    }
}
