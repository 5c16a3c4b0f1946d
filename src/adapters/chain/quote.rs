//! Exchange Quote Adapter - Live Price Reads
//!
//! Implements the `QuoteSource` port with a read-only `eth_call`
//! against the exchange's `getEthToTokenInputPrice`. No side effects;
//! the result reflects live chain state and may differ between calls
//! made moments apart.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::domain::price::PriceQuote;
use crate::ports::quote_source::{QuoteError, QuoteSource};

use super::contracts::UniswapExchange;
use super::provider::RpcProvider;

/// Reads conversion rates from the exchange contract.
pub struct ExchangeQuoteSource {
    /// Shared RPC provider.
    provider: Arc<RpcProvider>,
    /// Exchange contract address.
    exchange: Address,
}

impl ExchangeQuoteSource {
    /// Create a quote source bound to one exchange contract.
    pub fn new(provider: Arc<RpcProvider>, exchange: Address) -> Self {
        Self { provider, exchange }
    }
}

#[async_trait]
impl QuoteSource for ExchangeQuoteSource {
    #[instrument(skip(self), fields(input_wei = %input_wei))]
    async fn quote(&self, input_wei: U256) -> Result<PriceQuote, QuoteError> {
        let calldata = alloy::primitives::Bytes::from(
            UniswapExchange::getEthToTokenInputPriceCall {
                eth_sold: input_wei,
            }
            .abi_encode(),
        );

        let result = self
            .provider
            .inner()
            .call(
                &alloy::rpc::types::TransactionRequest::default()
                    .to(self.exchange)
                    .input(calldata.into()),
            )
            .await
            .map_err(|e| QuoteError::Transport(e.to_string()))?;

        let raw = U256::from_be_slice(&result);
        let raw_wei: u128 = raw
            .try_into()
            .map_err(|_| QuoteError::Malformed(format!("quote {raw} exceeds u128")))?;

        let quote = PriceQuote::from_wei(raw_wei)
            .map_err(|e| QuoteError::Malformed(e.to_string()))?;

        debug!(price = %quote, "Quote read from exchange");
        Ok(quote)
    }
}
