//! Trade Execution Port - Swap Submission Interface
//!
//! Defines the trait for constructing and submitting the triggering
//! swap transaction. Submission is fire-and-forget: success means the
//! node acknowledged the transaction, not that it was mined. The
//! monitor halts on that acknowledgment.

use alloy::primitives::U256;
use async_trait::async_trait;
use thiserror::Error;

use crate::domain::price::PriceQuote;

/// Transaction identifier returned by a successful submission.
pub type TxId = String;

/// Failures while submitting the swap.
#[derive(Debug, Error, Clone)]
pub enum SubmissionError {
  /// RPC transport failure before the node accepted the transaction.
  #[error("rpc transport failed: {0}")]
  Transport(String),
  /// The node or contract rejected the transaction.
  #[error("transaction rejected: {0}")]
  Rejected(String),
}

/// Trait for swap execution providers.
///
/// Implementors build the inner swap call from the triggering quote,
/// wrap it for the forwarding contract, and submit exactly one
/// transaction. Any failure is fatal to the monitoring session.
#[async_trait]
pub trait TradeExecution: Send + Sync + 'static {
  /// Swap `input_wei` of input asset at the just-observed `quote`.
  ///
  /// Returns the transaction hash on submission acknowledgment.
  async fn execute_trade(
    &self,
    input_wei: U256,
    quote: &PriceQuote,
  ) -> Result<TxId, SubmissionError>;
}
