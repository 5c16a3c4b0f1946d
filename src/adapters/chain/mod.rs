//! Chain Adapters - Ethereum Interaction Layer
//!
//! Provides on-chain access via alloy-rs 0.9 for:
//! - RPC provider management with chain-id validation
//! - Signing credentials loaded from the environment
//! - Contract bindings and deployed-code validation
//! - Live price reads from the exchange (QuoteSource port)
//! - Two-hop swap submission through the forwarder (TradeExecution port)
//! - Startup wallet balance reporting

pub mod balances;
pub mod contracts;
pub mod credentials;
pub mod executor;
pub mod provider;
pub mod quote;

pub use balances::WalletBalances;
pub use contracts::ContractAddresses;
pub use credentials::ChainCredentials;
pub use executor::{DryRunExecutor, ForwardingExecutor};
pub use provider::RpcProvider;
pub use quote::ExchangeQuoteSource;
