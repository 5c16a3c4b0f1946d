//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the monitor use case requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `QuoteSource`: read-only price queries against the exchange
//! - `TradeExecution`: one-shot swap construction and submission

pub mod quote_source;
pub mod trade_executor;
