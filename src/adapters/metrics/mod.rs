//! Metrics and Monitoring Adapters
//!
//! Provides the axum 0.7 health server (/live, /ready) and Prometheus
//! metrics export on /metrics. Follows the observability checklist
//! with JSON tracing spans.

pub mod health;
pub mod prometheus;

pub use health::{HealthServer, HealthState};
pub use prometheus::MetricsRegistry;
