//! Configuration Module - TOML-based Bot Configuration
//!
//! Loads and validates configuration from `config.toml` with
//! environment variable overrides for the RPC endpoint and the
//! polling interval. All contract addresses and trigger parameters
//! are externalized here - nothing is hardcoded in the domain layer.

pub mod loader;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Top-level bot configuration.
///
/// Loaded from `config.toml` at startup. All fields are validated
/// before the bot begins operation.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Bot identity and metadata.
  pub bot: BotConfig,
  /// Trigger threshold and trade sizing.
  pub trigger: TriggerConfig,
  /// Fixed transaction gas parameters.
  pub gas: GasConfig,
  /// RPC endpoint configuration.
  pub api: ApiConfig,
  /// On-chain contract addresses.
  pub contracts: ContractConfig,
  /// Metrics and monitoring.
  pub metrics: MetricsConfig,
}

/// Bot identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
  /// Human-readable bot name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
  /// Enable dry-run mode (no real transaction submitted on trigger).
  #[serde(default)]
  pub dry_run: bool,
}

/// Trigger threshold and trade sizing.
///
/// The bot sells when the quoted price drops to or below `sell_price`.
/// The threshold is read once here and never mutated afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct TriggerConfig {
  /// Sell threshold in output units per one input unit (DAI per ETH).
  pub sell_price: Decimal,
  /// Input amount to swap on trigger, in whole input units (ether).
  pub eth_amount: Decimal,
  /// Seconds between price checks. `POLLING_INTERVAL` env var overrides.
  #[serde(default = "default_poll_interval")]
  pub poll_interval_secs: u64,
  /// Slippage tolerance in basis points applied to the minimum output.
  /// Zero passes the just-observed quote through unchanged.
  #[serde(default)]
  pub slippage_bps: u32,
}

/// Fixed transaction gas parameters for the forwarded swap.
#[derive(Debug, Clone, Deserialize)]
pub struct GasConfig {
  /// Gas limit for the forwarded swap transaction.
  #[serde(default = "default_gas_limit")]
  pub gas_limit: u64,
  /// Legacy gas price in gwei.
  #[serde(default = "default_gas_price_gwei")]
  pub gas_price_gwei: u64,
}

/// RPC endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  /// Ethereum JSON-RPC endpoint. `RPC_URL` env var overrides.
  pub rpc_url: String,
  /// Expected chain ID, validated against the node at startup.
  pub chain_id: u64,
}

/// On-chain contract addresses.
///
/// Addresses are ALWAYS in config - never hardcoded.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractConfig {
  /// Exchange contract quoted and swapped against.
  pub exchange: String,
  /// Intermediary forwarding contract with the `execute` entry point.
  pub forwarder: String,
  /// Output token (DAI) contract, used for balance reporting.
  pub dai: String,
}

/// Metrics and monitoring configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
  /// Enable the health/metrics HTTP server.
  #[serde(default = "default_true")]
  pub enabled: bool,
  /// Health check endpoint port.
  #[serde(default = "default_health_port")]
  pub health_port: u16,
}

// Default value functions for serde

fn default_log_level() -> String {
  "info".to_string()
}

fn default_true() -> bool {
  true
}

fn default_poll_interval() -> u64 {
  10
}

fn default_gas_limit() -> u64 {
  8_000_000
}

fn default_gas_price_gwei() -> u64 {
  50
}

fn default_health_port() -> u16 {
  9090
}
