//! Price quote conversion and trigger arithmetic.
//!
//! The exchange answers price queries in the output token's smallest
//! denomination (18 decimals). This module converts those raw integers
//! into `Decimal` prices, decides whether a quote crosses the sell
//! threshold, and derives the minimum-output amount for a swap.
//!
//! All arithmetic is `Decimal`-checked; raw amounts that cannot be
//! represented surface as `PriceError` instead of wrapping.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Decimal places of the output token (DAI uses the full 18).
pub const OUTPUT_DECIMALS: u32 = 18;

/// Basis-point denominator for slippage tolerance.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Conversion failures for raw on-chain amounts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// Raw amount exceeds the representable `Decimal` range.
    #[error("raw amount {0} out of representable range")]
    AmountOutOfRange(u128),
    /// Intermediate multiplication overflowed.
    #[error("price arithmetic overflowed")]
    Overflow,
    /// Slippage tolerance at or above 100%.
    #[error("slippage tolerance {0} bps is not below {BPS_DENOMINATOR}")]
    SlippageTooLarge(u32),
}

/// A point-in-time conversion rate read from the exchange.
///
/// Holds both the raw smallest-denomination amount (for exact
/// minimum-output derivation and logging) and the decimal price.
/// Recomputed on every poll; never cached across ticks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Output amount in smallest-denomination units, as returned on-chain.
    pub raw_wei: u128,
    /// Output units per fixed input amount, at 18-decimal scale.
    pub price: Decimal,
}

impl PriceQuote {
    /// Convert a raw smallest-denomination amount into a quote.
    ///
    /// `10^18` converts to a price of exactly `1.0`.
    pub fn from_wei(raw_wei: u128) -> Result<Self, PriceError> {
        let price = decimal_from_raw(raw_wei, OUTPUT_DECIMALS)?;
        Ok(Self { raw_wei, price })
    }

    /// Whether this quote is at or below the sell threshold.
    ///
    /// The comparison is strict `<=` on decimal values; a quote exactly
    /// equal to the threshold triggers, one smallest unit above does not.
    pub fn at_or_below(&self, threshold: Decimal) -> bool {
        self.price <= threshold
    }
}

impl std::fmt::Display for PriceQuote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.price.normalize())
    }
}

/// Convert an ether-denominated decimal amount into wei.
///
/// Fractional wei are truncated.
pub fn to_wei(amount: Decimal) -> Result<u128, PriceError> {
    let scale = Decimal::from(10u64.pow(OUTPUT_DECIMALS));
    let wei = amount.checked_mul(scale).ok_or(PriceError::Overflow)?;
    wei.trunc().to_u128().ok_or(PriceError::Overflow)
}

/// Derive the minimum acceptable swap output in smallest-denomination units.
///
/// `price × input_wei` gives the output the just-observed quote promises
/// for `input_wei` of input; `slippage_bps` shaves a tolerance off that
/// amount (0 passes the raw quote through unchanged). The result is
/// truncated toward zero.
pub fn minimum_output(
    price: Decimal,
    input_wei: u128,
    slippage_bps: u32,
) -> Result<u128, PriceError> {
    if slippage_bps >= BPS_DENOMINATOR {
        return Err(PriceError::SlippageTooLarge(slippage_bps));
    }

    let input = decimal_from_raw(input_wei, 0)?;
    let gross = price.checked_mul(input).ok_or(PriceError::Overflow)?;

    let keep = Decimal::from(BPS_DENOMINATOR - slippage_bps)
        / Decimal::from(BPS_DENOMINATOR);
    let net = gross.checked_mul(keep).ok_or(PriceError::Overflow)?;

    net.trunc().to_u128().ok_or(PriceError::Overflow)
}

fn decimal_from_raw(raw: u128, scale: u32) -> Result<Decimal, PriceError> {
    let signed = i128::try_from(raw).map_err(|_| PriceError::AmountOutOfRange(raw))?;
    Decimal::try_from_i128_with_scale(signed, scale)
        .map_err(|_| PriceError::AmountOutOfRange(raw))
}
