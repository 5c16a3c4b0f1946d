//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, applying environment overrides,
//! validating all parameters, and providing clear error messages
//! for misconfiguration. A validation failure here aborts startup
//! before the first price check runs.

use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tracing::info;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// Environment overrides applied after parsing:
/// - `RPC_URL` replaces `api.rpc_url`
/// - `POLLING_INTERVAL` (seconds) replaces `trigger.poll_interval_secs`
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - An override is present but unparseable
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let mut config: AppConfig = toml::from_str(&content)
    .with_context(|| "Failed to parse config.toml")?;

  apply_env_overrides(&mut config)?;
  validate_config(&config)?;

  info!(
    sell_price = %config.trigger.sell_price,
    eth_amount = %config.trigger.eth_amount,
    poll_interval_secs = config.trigger.poll_interval_secs,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Apply environment variable overrides on top of the parsed file.
fn apply_env_overrides(config: &mut AppConfig) -> Result<()> {
  if let Ok(url) = std::env::var("RPC_URL") {
    config.api.rpc_url = url;
  }

  if let Ok(interval) = std::env::var("POLLING_INTERVAL") {
    config.trigger.poll_interval_secs = interval
      .parse()
      .with_context(|| format!("POLLING_INTERVAL is not a number of seconds: {interval}"))?;
  }

  Ok(())
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Positive threshold, trade amount, and polling interval
/// - Slippage tolerance below 100%
/// - Positive gas parameters
/// - Plausible contract addresses and a non-empty RPC endpoint
pub fn validate_config(config: &AppConfig) -> Result<()> {
  // Trigger validation
  anyhow::ensure!(
    config.trigger.sell_price > Decimal::ZERO,
    "sell_price must be positive, got {}",
    config.trigger.sell_price
  );
  anyhow::ensure!(
    config.trigger.eth_amount > Decimal::ZERO,
    "eth_amount must be positive, got {}",
    config.trigger.eth_amount
  );
  anyhow::ensure!(
    config.trigger.poll_interval_secs > 0,
    "poll_interval_secs must be positive"
  );
  anyhow::ensure!(
    config.trigger.slippage_bps < 10_000,
    "slippage_bps must be below 10000, got {}",
    config.trigger.slippage_bps
  );

  // Gas validation
  anyhow::ensure!(config.gas.gas_limit > 0, "gas_limit must be positive");
  anyhow::ensure!(
    config.gas.gas_price_gwei > 0,
    "gas_price_gwei must be positive"
  );

  // API validation
  anyhow::ensure!(!config.api.rpc_url.is_empty(), "RPC URL must not be empty");
  anyhow::ensure!(config.api.chain_id > 0, "chain_id must be positive");

  // Contract address shape; real parsing happens in the chain adapters
  for (name, addr) in [
    ("exchange", &config.contracts.exchange),
    ("forwarder", &config.contracts.forwarder),
    ("dai", &config.contracts.dai),
  ] {
    anyhow::ensure!(
      addr.starts_with("0x") && addr.len() == 42,
      "Contract address {name} is not a 0x-prefixed 20-byte hex string: {addr}"
    );
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  fn base_config() -> AppConfig {
    toml::from_str(
      r#"
      [bot]
      name = "test-bot"

      [trigger]
      sell_price = "202"
      eth_amount = "0.01"

      [gas]

      [api]
      rpc_url = "http://localhost:8545"
      chain_id = 3

      [contracts]
      exchange = "0xc0fc958f7108be4060F33a699a92d3ea49b0B5f0"
      forwarder = "0x6A740680d2e4B98DD4CEE7B1b533Eb74B79b24C6"
      dai = "0xad6d458402f60fd3bd25163575031acdce07538d"

      [metrics]
      "#,
    )
    .unwrap()
  }

  #[test]
  fn test_load_nonexistent_file() {
    let result = load_config("nonexistent.toml");
    assert!(result.is_err());
  }

  #[test]
  fn test_defaults_applied() {
    let config = base_config();
    assert_eq!(config.trigger.poll_interval_secs, 10);
    assert_eq!(config.trigger.slippage_bps, 0);
    assert_eq!(config.gas.gas_limit, 8_000_000);
    assert_eq!(config.gas.gas_price_gwei, 50);
    assert!(!config.bot.dry_run);
    assert!(config.metrics.enabled);
  }

  #[test]
  fn test_valid_config_passes() {
    assert!(validate_config(&base_config()).is_ok());
  }

  #[test]
  fn test_zero_threshold_rejected() {
    let mut config = base_config();
    config.trigger.sell_price = dec!(0);
    assert!(validate_config(&config).is_err());
  }

  #[test]
  fn test_full_slippage_rejected() {
    let mut config = base_config();
    config.trigger.slippage_bps = 10_000;
    assert!(validate_config(&config).is_err());
  }

  #[test]
  fn test_malformed_address_rejected() {
    let mut config = base_config();
    config.contracts.exchange = "c0fc958f".to_string();
    assert!(validate_config(&config).is_err());
  }
}
