//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement the
//! bot's core workflow.
//!
//! Use cases:
//! - `PriceMonitor`: periodic quote checks with one-shot trade
//!   execution and permanent halt

pub mod monitor;

pub use monitor::{PriceMonitor, TickOutcome};
