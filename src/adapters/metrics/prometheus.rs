//! Prometheus Metrics Registry - Monitoring Observability
//!
//! Registers the metrics exported on the health server's `/metrics`
//! route: price checks performed, the last quoted price, and the
//! one-shot trade/halt state of the monitor.

use prometheus::{Encoder, Gauge, IntCounter, Registry, TextEncoder};

/// Centralized Prometheus metrics for the trigger bot.
///
/// All metrics follow the naming convention `trigger_bot_*`.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Total price checks performed.
    pub ticks_total: IntCounter,
    /// Total ticks skipped because a check was still in flight.
    pub ticks_skipped: IntCounter,
    /// Last quoted price (output units per input unit).
    pub quote_price: Gauge,
    /// Total trades submitted (0 or 1 over the process lifetime).
    pub trades_submitted: IntCounter,
    /// Whether monitoring has halted (1=halted, 0=active).
    pub monitor_halted: Gauge,
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let ticks_total = IntCounter::new(
            "trigger_bot_ticks_total",
            "Total price checks performed",
        )?;

        let ticks_skipped = IntCounter::new(
            "trigger_bot_ticks_skipped_total",
            "Ticks skipped because a previous check was still in flight",
        )?;

        let quote_price = Gauge::new(
            "trigger_bot_quote_price",
            "Last quoted price in output units per input unit",
        )?;

        let trades_submitted = IntCounter::new(
            "trigger_bot_trades_submitted_total",
            "Trades submitted through the forwarder",
        )?;

        let monitor_halted = Gauge::new(
            "trigger_bot_monitor_halted",
            "Whether monitoring has halted (1=halted, 0=active)",
        )?;

        // Register all metrics
        registry.register(Box::new(ticks_total.clone()))?;
        registry.register(Box::new(ticks_skipped.clone()))?;
        registry.register(Box::new(quote_price.clone()))?;
        registry.register(Box::new(trades_submitted.clone()))?;
        registry.register(Box::new(monitor_halted.clone()))?;

        Ok(Self {
            registry,
            ticks_total,
            ticks_skipped,
            quote_price,
            trades_submitted,
            monitor_halted,
        })
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        if encoder.encode(&metric_families, &mut buffer).is_err() {
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_register_and_render() {
        let metrics = MetricsRegistry::new().unwrap();
        metrics.ticks_total.inc();
        metrics.quote_price.set(201.99);
        metrics.monitor_halted.set(1.0);

        let rendered = metrics.render();
        assert!(rendered.contains("trigger_bot_ticks_total 1"));
        assert!(rendered.contains("trigger_bot_monitor_halted 1"));
    }
}
