//! Wallet Balance Reporting - Startup Sanity Read
//!
//! Reads the trading account's ETH and DAI balances once at startup
//! and logs them, so a misfunded account is visible before the first
//! price check. Not consulted by the monitoring loop itself.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolCall;
use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::domain::price::PriceQuote;

use super::contracts::ERC20;
use super::provider::RpcProvider;

/// One-shot balance reader for the trading account.
pub struct WalletBalances {
    /// Shared RPC provider.
    provider: Arc<RpcProvider>,
    /// Output token (DAI) contract address.
    dai: Address,
    /// Trading account.
    account: Address,
}

impl WalletBalances {
    /// Create a balance reader for one account.
    pub fn new(provider: Arc<RpcProvider>, dai: Address, account: Address) -> Self {
        Self {
            provider,
            dai,
            account,
        }
    }

    /// Log the account's ETH and DAI balances in whole units.
    #[instrument(skip(self))]
    pub async fn report(&self) -> Result<()> {
        let inner = self.provider.inner();

        let eth_wei = inner
            .get_balance(self.account)
            .await
            .context("Failed to query ETH balance")?;

        let calldata = alloy::primitives::Bytes::from(
            ERC20::balanceOfCall {
                owner: self.account,
            }
            .abi_encode(),
        );
        let result = inner
            .call(
                &alloy::rpc::types::TransactionRequest::default()
                    .to(self.dai)
                    .input(calldata.into()),
            )
            .await
            .context("DAI balanceOf call failed")?;
        let dai_wei = U256::from_be_slice(&result);

        info!(
            eth = %display_units(eth_wei),
            dai = %display_units(dai_wei),
            account = %self.account,
            "Wallet balances"
        );

        Ok(())
    }
}

/// Render a wei-denominated balance in whole units for logging.
fn display_units(raw: U256) -> String {
    u128::try_from(raw)
        .ok()
        .and_then(|wei| PriceQuote::from_wei(wei).ok())
        .map_or_else(|| format!("{raw} wei"), |q| q.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_units_whole() {
        assert_eq!(
            display_units(U256::from(1_000_000_000_000_000_000u128)),
            "1"
        );
    }

    #[test]
    fn test_display_units_fractional() {
        assert_eq!(
            display_units(U256::from(2_020_000_000_000_000_000u128)),
            "2.02"
        );
    }

    #[test]
    fn test_display_units_overflow_falls_back_to_wei() {
        assert_eq!(display_units(U256::MAX), format!("{} wei", U256::MAX));
    }
}
