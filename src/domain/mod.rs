//! Domain layer - Core business logic and models.
//!
//! Pure price and time arithmetic for the trigger bot. No external
//! I/O dependencies allowed here (hexagonal architecture inner ring);
//! everything is testable in isolation.

pub mod deadline;
pub mod price;

// Re-export core types for convenience
pub use deadline::{Clock, SWAP_DEADLINE_SECS, SystemClock, swap_deadline};
pub use price::{OUTPUT_DECIMALS, PriceError, PriceQuote, minimum_output, to_wei};
