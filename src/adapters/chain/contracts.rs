//! Contract Bindings - Exchange, Forwarder, and Token ABIs
//!
//! `sol!`-generated bindings for the three contracts the bot touches:
//! the exchange it quotes and swaps against, the intermediary
//! forwarding contract the swap is routed through, and the output
//! token for balance reporting. Contract addresses come from
//! `config.toml` and are validated on-chain at startup.

use alloy::primitives::Address;
use alloy::sol;
use anyhow::{bail, Context, Result};
use tracing::{info, instrument};

use crate::config::ContractConfig;

use super::provider::RpcProvider;

sol! {
    /// ETH/token exchange: read-only quote plus the swap entry point.
    contract UniswapExchange {
        function getEthToTokenInputPrice(uint256 eth_sold) external view returns (uint256 tokens_bought);
        function ethToTokenSwapInput(uint256 min_tokens, uint256 deadline) external payable returns (uint256 tokens_bought);
    }

    /// Intermediary executor: forwards value and payload to a target,
    /// reverting the whole transaction if the forwarded call reverts.
    contract Forwarder {
        function execute(address target, uint256 weiValue, bytes payload) external payable;
    }

    /// Minimal ERC-20 surface for balance reporting.
    contract ERC20 {
        function balanceOf(address owner) external view returns (uint256 balance);
    }
}

/// Contract addresses loaded from config.
#[derive(Debug, Clone, Copy)]
pub struct ContractAddresses {
    /// Exchange contract quoted and swapped against.
    pub exchange: Address,
    /// Intermediary forwarding contract.
    pub forwarder: Address,
    /// Output token (DAI) contract.
    pub dai: Address,
}

impl ContractAddresses {
    /// Parse addresses out of the validated config section.
    pub fn from_config(config: &ContractConfig) -> Result<Self> {
        Ok(Self {
            exchange: config
                .exchange
                .parse()
                .context("Invalid exchange address")?,
            forwarder: config
                .forwarder
                .parse()
                .context("Invalid forwarder address")?,
            dai: config.dai.parse().context("Invalid dai address")?,
        })
    }

    /// Validate that each contract address has deployed code on-chain.
    ///
    /// This prevents misconfiguration from silently failing at runtime.
    #[instrument(skip_all)]
    pub async fn validate_deployed(&self, provider: &RpcProvider) -> Result<()> {
        let inner = provider.inner();

        for (name, addr) in [
            ("Exchange", self.exchange),
            ("Forwarder", self.forwarder),
            ("DAI", self.dai),
        ] {
            let code = inner
                .get_code_at(addr)
                .await
                .context(format!("Failed to query code for {name}"))?;

            if code.is_empty() {
                bail!(
                    "Contract {name} at {} has no deployed code — check config.toml",
                    addr
                );
            }

            info!(contract = name, address = %addr, "Validated on-chain");
        }

        Ok(())
    }
}
