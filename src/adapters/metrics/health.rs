//! Health Check Server - Liveness, Readiness, and Metrics
//!
//! Exposes /live, /ready, and /metrics endpoints via axum 0.7 for
//! Docker health checks and monitoring. Readiness depends on chain
//! client health; a halted monitor keeps the process (and this
//! server) alive even though no further checks run.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use tokio::sync::broadcast;
use tracing::{info, instrument};

use super::prometheus::MetricsRegistry;

/// Shared health state polled by readiness probes.
#[derive(Debug, Clone)]
pub struct HealthState {
    /// Whether the chain client is connected.
    pub chain_healthy: Arc<AtomicBool>,
}

impl HealthState {
    /// Create a new health state (healthy by default).
    pub fn new() -> Self {
        Self {
            chain_healthy: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Check if the system is ready to serve traffic.
    pub fn is_ready(&self) -> bool {
        self.chain_healthy.load(Ordering::Relaxed)
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

/// Axum-based health check HTTP server.
#[derive(Clone)]
struct ServerState {
    health: Arc<HealthState>,
    metrics: Arc<MetricsRegistry>,
}

/// Serves liveness (/live), readiness (/ready), and Prometheus
/// metrics (/metrics) for orchestrator probes and dashboards.
pub struct HealthServer {
    /// Health state shared with all components.
    state: Arc<HealthState>,
    /// Metrics rendered on /metrics.
    metrics: Arc<MetricsRegistry>,
    /// Bind port (default 9090 from config).
    port: u16,
}

impl HealthServer {
    /// Create a new health server.
    pub fn new(state: Arc<HealthState>, metrics: Arc<MetricsRegistry>, port: u16) -> Self {
        Self {
            state,
            metrics,
            port,
        }
    }

    /// Start the health check server in the background.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) -> anyhow::Result<()> {
        let app = Router::new()
            .route("/live", get(Self::liveness))
            .route("/ready", get(Self::readiness))
            .route("/metrics", get(Self::metrics))
            .with_state(ServerState {
                health: Arc::clone(&self.state),
                metrics: Arc::clone(&self.metrics),
            });

        let addr = format!("0.0.0.0:{}", self.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        info!(address = %addr, "Health server started");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        Ok(())
    }

    /// Liveness probe: always returns 200 if the process is running.
    async fn liveness() -> impl IntoResponse {
        (StatusCode::OK, "OK")
    }

    /// Readiness probe: returns 200 only if the chain client is healthy.
    async fn readiness(State(state): State<ServerState>) -> impl IntoResponse {
        if state.health.is_ready() {
            (StatusCode::OK, "READY")
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
        }
    }

    /// Prometheus text-format metrics.
    async fn metrics(State(state): State<ServerState>) -> impl IntoResponse {
        (StatusCode::OK, state.metrics.render())
    }
}
