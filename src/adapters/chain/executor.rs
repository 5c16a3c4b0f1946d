//! Forwarding Trade Executor - Two-hop Swap Submission
//!
//! Implements the `TradeExecution` port. A trade is built in two
//! explicit stages so each byte layout is testable on its own:
//!
//! 1. [`encode_swap_call`] — ABI-encode the exchange's
//!    `ethToTokenSwapInput(min_tokens, deadline)` entry point.
//! 2. [`ForwardedCall`] — wrap that payload with the exchange address
//!    and the value to forward, producing the calldata for the
//!    intermediary contract's `execute(target, weiValue, payload)`.
//!
//! The wrapped call is submitted as a single transaction with fixed
//! gas parameters. Submission is fire-and-forget: the returned hash
//! is the node's acknowledgment, not a mined receipt.

use std::sync::Arc;

use alloy::primitives::{Address, Bytes, TxKind, U256};
use alloy::rpc::types::eth::{TransactionInput, TransactionRequest};
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::config::GasConfig;
use crate::domain::deadline::{swap_deadline, Clock, SystemClock};
use crate::domain::price::{minimum_output, PriceQuote};
use crate::ports::trade_executor::{SubmissionError, TradeExecution, TxId};

use super::contracts::{Forwarder, UniswapExchange};
use super::provider::RpcProvider;

const WEI_PER_GWEI: u128 = 1_000_000_000;

/// Stage 1: encode the inner swap call against the exchange.
pub fn encode_swap_call(min_tokens: U256, deadline: u64) -> Bytes {
    UniswapExchange::ethToTokenSwapInputCall {
        min_tokens,
        deadline: U256::from(deadline),
    }
    .abi_encode()
    .into()
}

/// Stage 2: an inner call payload wrapped for the intermediary contract.
///
/// Built fresh per trade attempt and discarded after submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardedCall {
    /// Contract the intermediary relays the payload to.
    pub target: Address,
    /// Value in wei forwarded from the intermediary's own balance.
    pub value: U256,
    /// ABI-encoded inner call.
    pub payload: Bytes,
}

impl ForwardedCall {
    /// Wrap an encoded inner call for forwarding.
    pub fn new(target: Address, value: U256, payload: Bytes) -> Self {
        Self {
            target,
            value,
            payload,
        }
    }

    /// Calldata for the intermediary's `execute` entry point.
    pub fn calldata(&self) -> Bytes {
        Forwarder::executeCall {
            target: self.target,
            weiValue: self.value,
            payload: self.payload.clone(),
        }
        .abi_encode()
        .into()
    }
}

/// Submits triggered swaps through the forwarding contract.
///
/// Generic over [`Clock`] so deadline computation is testable; the
/// default system clock is used in production wiring.
pub struct ForwardingExecutor<C: Clock = SystemClock> {
    /// Shared RPC provider (signing filler included).
    provider: Arc<RpcProvider>,
    /// Exchange contract the inner call targets.
    exchange: Address,
    /// Intermediary contract the transaction is sent to.
    forwarder: Address,
    /// Transaction sender.
    sender: Address,
    /// Fixed gas limit for the swap transaction.
    gas_limit: u64,
    /// Fixed legacy gas price in wei.
    gas_price_wei: u128,
    /// Slippage tolerance applied to the minimum output.
    slippage_bps: u32,
    /// Time source for deadline computation.
    clock: C,
}

impl ForwardingExecutor<SystemClock> {
    /// Create an executor using the system clock.
    pub fn new(
        provider: Arc<RpcProvider>,
        exchange: Address,
        forwarder: Address,
        sender: Address,
        gas: &GasConfig,
        slippage_bps: u32,
    ) -> Self {
        Self::with_clock(
            provider, exchange, forwarder, sender, gas, slippage_bps, SystemClock,
        )
    }
}

impl<C: Clock> ForwardingExecutor<C> {
    /// Create an executor with an explicit time source.
    pub fn with_clock(
        provider: Arc<RpcProvider>,
        exchange: Address,
        forwarder: Address,
        sender: Address,
        gas: &GasConfig,
        slippage_bps: u32,
        clock: C,
    ) -> Self {
        Self {
            provider,
            exchange,
            forwarder,
            sender,
            gas_limit: gas.gas_limit,
            gas_price_wei: u128::from(gas.gas_price_gwei) * WEI_PER_GWEI,
            slippage_bps,
            clock,
        }
    }
}

#[async_trait]
impl<C: Clock + 'static> TradeExecution for ForwardingExecutor<C> {
    #[instrument(skip(self, quote), fields(input_wei = %input_wei, price = %quote))]
    async fn execute_trade(
        &self,
        input_wei: U256,
        quote: &PriceQuote,
    ) -> Result<TxId, SubmissionError> {
        let deadline = swap_deadline(&self.clock);

        let input: u128 = input_wei
            .try_into()
            .map_err(|_| SubmissionError::Rejected(format!("input {input_wei} exceeds u128")))?;
        let min_tokens = minimum_output(quote.price, input, self.slippage_bps)
            .map_err(|e| SubmissionError::Rejected(e.to_string()))?;

        let payload = encode_swap_call(U256::from(min_tokens), deadline);
        let call = ForwardedCall::new(self.exchange, input_wei, payload);

        let request = TransactionRequest {
            from: Some(self.sender),
            to: Some(TxKind::Call(self.forwarder)),
            gas: Some(self.gas_limit),
            gas_price: Some(self.gas_price_wei),
            input: TransactionInput::new(call.calldata()),
            ..Default::default()
        };

        let pending = self
            .provider
            .inner()
            .send_transaction(request)
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        let tx_hash = *pending.tx_hash();
        info!(
            tx = %tx_hash,
            deadline,
            min_tokens,
            "Swap submitted through forwarder"
        );

        Ok(format!("{tx_hash}"))
    }
}

/// Dry-run executor: acknowledges the trigger without touching the chain.
///
/// Wired in place of [`ForwardingExecutor`] when `bot.dry_run` is set,
/// so the monitor's one-shot semantics can be exercised safely.
pub struct DryRunExecutor {
    /// Slippage tolerance, mirrored from the live configuration.
    slippage_bps: u32,
}

impl DryRunExecutor {
    /// Create a dry-run executor.
    pub fn new(slippage_bps: u32) -> Self {
        Self { slippage_bps }
    }
}

#[async_trait]
impl TradeExecution for DryRunExecutor {
    async fn execute_trade(
        &self,
        input_wei: U256,
        quote: &PriceQuote,
    ) -> Result<TxId, SubmissionError> {
        let input: u128 = input_wei
            .try_into()
            .map_err(|_| SubmissionError::Rejected(format!("input {input_wei} exceeds u128")))?;
        let min_tokens = minimum_output(quote.price, input, self.slippage_bps)
            .map_err(|e| SubmissionError::Rejected(e.to_string()))?;

        warn!(
            input_wei = %input_wei,
            min_tokens,
            price = %quote,
            "Dry-run mode — trigger reached, NO transaction submitted"
        );

        Ok("dry-run".to_string())
    }
}
