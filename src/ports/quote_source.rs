//! Quote Source Port - On-chain Price Query Interface
//!
//! Defines the trait for asking the exchange how much output asset a
//! fixed input amount buys at the current chain state. The answer is
//! live state: two calls microseconds apart may differ, which is why
//! the monitor guards against overlapping checks.

use alloy::primitives::U256;
use async_trait::async_trait;
use thiserror::Error;

use crate::domain::price::PriceQuote;

/// Failures while reading the current quote.
#[derive(Debug, Error, Clone)]
pub enum QuoteError {
  /// RPC transport or contract-call failure.
  #[error("quote call failed: {0}")]
  Transport(String),
  /// The call succeeded but the response could not be interpreted.
  #[error("quote response malformed: {0}")]
  Malformed(String),
}

/// Trait for read-only price queries against the exchange.
///
/// Implementors perform an `eth_call` with no side effects. Errors
/// propagate to the monitor, which treats them as fatal to the
/// monitoring session.
#[async_trait]
pub trait QuoteSource: Send + Sync + 'static {
  /// How much output asset `input_wei` of input buys right now.
  async fn quote(&self, input_wei: U256) -> Result<PriceQuote, QuoteError>;
}
