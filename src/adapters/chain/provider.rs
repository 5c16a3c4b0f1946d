//! Ethereum RPC Provider - alloy-rs 0.9 Connection Management
//!
//! Manages the connection to the Ethereum network via alloy-rs.
//! Validates RPC connectivity and the expected chain ID at startup
//! and exposes a shared provider instance for all on-chain operations.
//!
//! In alloy 0.9, `ProviderBuilder::new().wallet(..).on_http()` returns
//! a complex filler type. We store it as a type-erased `dyn Provider`
//! to keep the API clean across the adapter layer. The wallet filler
//! stays inside the erased provider, so `send_transaction` signs with
//! the configured key.

use std::sync::Arc;

use alloy::network::EthereumWallet;
use alloy::providers::{Provider, ProviderBuilder};
use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::config::ApiConfig;

/// Shared Ethereum RPC provider backed by alloy-rs 0.9.
///
/// All chain adapters share a single provider instance to avoid
/// redundant connections and enable connection pooling.
pub struct RpcProvider {
    /// The alloy HTTP provider (type-erased, wallet filler included).
    provider: Arc<dyn Provider + Send + Sync>,
    /// RPC endpoint URL (for diagnostics, never logged with secrets).
    #[allow(dead_code)]
    rpc_url: String,
}

impl RpcProvider {
    /// Connect to the RPC endpoint and validate the chain ID.
    ///
    /// The URL comes from `config.toml` (or the `RPC_URL` override) and
    /// the wallet from the `PRIVATE_KEY` env var. The node's chain ID
    /// must match `config.api.chain_id`; a mismatch aborts startup so a
    /// mainnet key is never pointed at the wrong network.
    #[instrument(skip_all)]
    pub async fn connect(config: &ApiConfig, wallet: EthereumWallet) -> Result<Self> {
        let rpc_url = config.rpc_url.clone();

        // alloy 0.9: on_http() is synchronous, returns impl Provider
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .on_http(rpc_url.parse().context("Invalid RPC URL")?);

        // Wrap in Arc<dyn Provider> for type erasure
        let provider: Arc<dyn Provider + Send + Sync> = Arc::new(provider);

        let chain_id = provider
            .get_chain_id()
            .await
            .context("Failed to query chain ID")?;

        if chain_id != config.chain_id {
            anyhow::bail!(
                "Expected chain_id={}, node reports {chain_id}",
                config.chain_id
            );
        }

        info!(chain_id, "Connected to Ethereum RPC");

        Ok(Self { provider, rpc_url })
    }

    /// Get a shared reference to the alloy provider (type-erased).
    pub fn inner(&self) -> Arc<dyn Provider + Send + Sync> {
        Arc::clone(&self.provider)
    }

    /// Check if the RPC connection is healthy via a lightweight call.
    pub async fn is_healthy(&self) -> bool {
        self.provider.get_block_number().await.is_ok()
    }
}
