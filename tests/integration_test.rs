//! Integration Tests - Monitor State Machine Scenarios
//!
//! Tests the interaction between the price monitor and mock port
//! adapters. Uses mockall for trait mocking plus hand-rolled async
//! doubles where a scenario needs a delayed or scripted response.
//! Paused tokio time keeps the interval-driven scenarios deterministic.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use alloy::primitives::U256;
use async_trait::async_trait;
use mockall::mock;
use rust_decimal_macros::dec;
use tokio::sync::broadcast;

use uniswap_trigger_bot::adapters::metrics::MetricsRegistry;
use uniswap_trigger_bot::config::TriggerConfig;
use uniswap_trigger_bot::domain::price::PriceQuote;
use uniswap_trigger_bot::ports::quote_source::{QuoteError, QuoteSource};
use uniswap_trigger_bot::ports::trade_executor::{SubmissionError, TradeExecution, TxId};
use uniswap_trigger_bot::usecases::{PriceMonitor, TickOutcome};

const ONE_ETH_WEI: u128 = 1_000_000_000_000_000_000;
const TRADE_AMOUNT_WEI: u128 = 10_000_000_000_000_000; // 0.01 ETH

// ---- Mock Definitions ----

mock! {
    pub QuoteSrc {}

    #[async_trait::async_trait]
    impl QuoteSource for QuoteSrc {
        async fn quote(&self, input_wei: U256) -> Result<PriceQuote, QuoteError>;
    }
}

mock! {
    pub TradeExec {}

    #[async_trait::async_trait]
    impl TradeExecution for TradeExec {
        async fn execute_trade(
            &self,
            input_wei: U256,
            quote: &PriceQuote,
        ) -> Result<TxId, SubmissionError>;
    }
}

// ---- Hand-rolled doubles for delayed / scripted responses ----

/// Quote source that sleeps before answering, to simulate RPC latency.
struct SlowQuote {
    calls: Arc<AtomicUsize>,
    delay: Duration,
    raw_wei: u128,
}

#[async_trait]
impl QuoteSource for SlowQuote {
    async fn quote(&self, _input_wei: U256) -> Result<PriceQuote, QuoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(PriceQuote::from_wei(self.raw_wei).unwrap())
    }
}

/// Quote source that answers from a fixed script, one entry per call.
struct ScriptedQuote {
    calls: Arc<AtomicUsize>,
    script: Vec<Result<u128, String>>,
}

#[async_trait]
impl QuoteSource for ScriptedQuote {
    async fn quote(&self, _input_wei: U256) -> Result<PriceQuote, QuoteError> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script.get(index) {
            Some(Ok(raw)) => Ok(PriceQuote::from_wei(*raw).unwrap()),
            Some(Err(msg)) => Err(QuoteError::Transport(msg.clone())),
            None => Err(QuoteError::Transport("script exhausted".to_string())),
        }
    }
}

/// Executor that counts submissions and always acknowledges.
struct CountingExec {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl TradeExecution for CountingExec {
    async fn execute_trade(
        &self,
        _input_wei: U256,
        _quote: &PriceQuote,
    ) -> Result<TxId, SubmissionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok("0xsubmitted".to_string())
    }
}

// ---- Helpers ----

fn trigger_config() -> TriggerConfig {
    TriggerConfig {
        sell_price: dec!(202),
        eth_amount: dec!(0.01),
        poll_interval_secs: 10,
        slippage_bps: 0,
    }
}

fn monitor_with(
    quote_source: Arc<dyn QuoteSource>,
    executor: Arc<dyn TradeExecution>,
) -> PriceMonitor {
    PriceMonitor::new(
        quote_source,
        executor,
        Arc::new(MetricsRegistry::new().unwrap()),
        &trigger_config(),
    )
    .unwrap()
}

// ---- Tick Scenarios ----

#[tokio::test]
async fn test_quote_below_threshold_triggers_exactly_one_trade() {
    let mut quote = MockQuoteSrc::new();
    quote
        .expect_quote()
        .times(1)
        .returning(|_| Ok(PriceQuote::from_wei(201_999_900_000_000_000_000).unwrap()));

    let mut exec = MockTradeExec::new();
    exec
        .expect_execute_trade()
        .times(1)
        .withf(|input_wei, quote| {
            *input_wei == U256::from(TRADE_AMOUNT_WEI) && quote.price == dec!(201.9999)
        })
        .returning(|_, _| Ok("0xabc123".to_string()));

    let monitor = monitor_with(Arc::new(quote), Arc::new(exec));

    let outcome = monitor.tick().await;
    assert_eq!(outcome, TickOutcome::Triggered("0xabc123".to_string()));
    assert!(monitor.is_stopped());
    assert!(!monitor.is_in_flight());

    // A forced tick after the halt must not touch the quote source
    // (the times(1) expectation enforces it on drop).
    assert_eq!(monitor.tick().await, TickOutcome::Halted);
}

#[tokio::test]
async fn test_quote_above_threshold_keeps_polling() {
    let mut quote = MockQuoteSrc::new();
    quote
        .expect_quote()
        .times(2)
        .returning(|_| Ok(PriceQuote::from_wei(205 * ONE_ETH_WEI).unwrap()));

    let mut exec = MockTradeExec::new();
    exec.expect_execute_trade().times(0);

    let monitor = monitor_with(Arc::new(quote), Arc::new(exec));

    assert_eq!(monitor.tick().await, TickOutcome::NotTriggered);
    assert!(!monitor.is_stopped());
    assert!(!monitor.is_in_flight());

    // Next tick proceeds normally.
    assert_eq!(monitor.tick().await, TickOutcome::NotTriggered);
}

#[tokio::test]
async fn test_quote_exactly_at_threshold_triggers() {
    let mut quote = MockQuoteSrc::new();
    quote
        .expect_quote()
        .times(1)
        .returning(|_| Ok(PriceQuote::from_wei(202 * ONE_ETH_WEI).unwrap()));

    let mut exec = MockTradeExec::new();
    exec
        .expect_execute_trade()
        .times(1)
        .returning(|_, _| Ok("0xeq".to_string()));

    let monitor = monitor_with(Arc::new(quote), Arc::new(exec));
    assert_eq!(monitor.tick().await, TickOutcome::Triggered("0xeq".to_string()));
}

#[tokio::test]
async fn test_quote_one_wei_above_threshold_does_not_trigger() {
    let mut quote = MockQuoteSrc::new();
    quote
        .expect_quote()
        .times(1)
        .returning(|_| Ok(PriceQuote::from_wei(202 * ONE_ETH_WEI + 1).unwrap()));

    let mut exec = MockTradeExec::new();
    exec.expect_execute_trade().times(0);

    let monitor = monitor_with(Arc::new(quote), Arc::new(exec));
    assert_eq!(monitor.tick().await, TickOutcome::NotTriggered);
}

#[tokio::test]
async fn test_quote_failure_halts_without_trade() {
    let mut quote = MockQuoteSrc::new();
    quote
        .expect_quote()
        .times(1)
        .returning(|_| Err(QuoteError::Transport("connection refused".to_string())));

    let mut exec = MockTradeExec::new();
    exec.expect_execute_trade().times(0);

    let monitor = monitor_with(Arc::new(quote), Arc::new(exec));

    assert_eq!(monitor.tick().await, TickOutcome::Aborted);
    assert!(monitor.is_stopped());
    assert!(!monitor.is_in_flight());
    assert_eq!(monitor.tick().await, TickOutcome::Halted);
}

#[tokio::test]
async fn test_submission_failure_halts_monitoring() {
    let mut quote = MockQuoteSrc::new();
    quote
        .expect_quote()
        .times(1)
        .returning(|_| Ok(PriceQuote::from_wei(200 * ONE_ETH_WEI).unwrap()));

    let mut exec = MockTradeExec::new();
    exec
        .expect_execute_trade()
        .times(1)
        .returning(|_, _| Err(SubmissionError::Rejected("insufficient funds".to_string())));

    let monitor = monitor_with(Arc::new(quote), Arc::new(exec));

    assert_eq!(monitor.tick().await, TickOutcome::Aborted);
    assert!(monitor.is_stopped());
}

// ---- No-overlap Invariant ----

#[tokio::test(start_paused = true)]
async fn test_overlapping_tick_is_skipped() {
    let calls = Arc::new(AtomicUsize::new(0));
    let quote = SlowQuote {
        calls: Arc::clone(&calls),
        delay: Duration::from_millis(100),
        raw_wei: 205 * ONE_ETH_WEI,
    };
    let submissions = Arc::new(AtomicUsize::new(0));
    let exec = CountingExec {
        calls: Arc::clone(&submissions),
    };

    let monitor = Arc::new(monitor_with(Arc::new(quote), Arc::new(exec)));
    let second = Arc::clone(&monitor);

    // Fire a second tick while the first is still awaiting its quote.
    let (first_outcome, second_outcome) = tokio::join!(monitor.tick(), async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(second.is_in_flight());
        second.tick().await
    });

    assert_eq!(first_outcome, TickOutcome::NotTriggered);
    assert_eq!(second_outcome, TickOutcome::Skipped);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(submissions.load(Ordering::SeqCst), 0);
}

// ---- Run Loop Scenarios ----

#[tokio::test(start_paused = true)]
async fn test_run_loop_stops_after_trigger() {
    let calls = Arc::new(AtomicUsize::new(0));
    let quote = ScriptedQuote {
        calls: Arc::clone(&calls),
        script: vec![
            Ok(205 * ONE_ETH_WEI),
            Ok(203 * ONE_ETH_WEI),
            Ok(201_999_900_000_000_000_000),
        ],
    };
    let submissions = Arc::new(AtomicUsize::new(0));
    let exec = CountingExec {
        calls: Arc::clone(&submissions),
    };

    let monitor = monitor_with(Arc::new(quote), Arc::new(exec));
    let (_shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);

    tokio::time::timeout(Duration::from_secs(300), monitor.run(shutdown_rx))
        .await
        .expect("run loop must exit after the trigger")
        .unwrap();

    // The third check triggered; the cancelled timer never drove a fourth.
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(submissions.load(Ordering::SeqCst), 1);
    assert!(monitor.is_stopped());
}

#[tokio::test(start_paused = true)]
async fn test_run_loop_stops_after_quote_failure() {
    let calls = Arc::new(AtomicUsize::new(0));
    let quote = ScriptedQuote {
        calls: Arc::clone(&calls),
        script: vec![Ok(205 * ONE_ETH_WEI), Err("rpc timeout".to_string())],
    };
    let submissions = Arc::new(AtomicUsize::new(0));
    let exec = CountingExec {
        calls: Arc::clone(&submissions),
    };

    let monitor = monitor_with(Arc::new(quote), Arc::new(exec));
    let (_shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);

    tokio::time::timeout(Duration::from_secs(300), monitor.run(shutdown_rx))
        .await
        .expect("run loop must exit after the failure")
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(submissions.load(Ordering::SeqCst), 0);
    assert!(monitor.is_stopped());
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_signal_stops_loop_without_halting_state() {
    let calls = Arc::new(AtomicUsize::new(0));
    let quote = ScriptedQuote {
        calls: Arc::clone(&calls),
        script: vec![Ok(205 * ONE_ETH_WEI); 4],
    };
    let exec = CountingExec {
        calls: Arc::new(AtomicUsize::new(0)),
    };

    let monitor = Arc::new(monitor_with(Arc::new(quote), Arc::new(exec)));
    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);

    let run_ref = Arc::clone(&monitor);
    let handle = tokio::spawn(async move { run_ref.run(shutdown_rx).await });

    // Let a couple of ticks happen, then ask for shutdown.
    tokio::time::sleep(Duration::from_secs(25)).await;
    shutdown_tx.send(()).unwrap();

    tokio::time::timeout(Duration::from_secs(60), handle)
        .await
        .expect("run loop must exit on shutdown")
        .unwrap()
        .unwrap();

    // Shutdown is not a trigger: the one-shot latch stays unset.
    assert!(!monitor.is_stopped());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
