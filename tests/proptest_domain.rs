//! Property-Based Tests — Domain Layer Invariants
//!
//! Uses `proptest` to verify that the price-conversion and
//! minimum-output arithmetic maintain their invariants across
//! random inputs.

use proptest::prelude::*;
use rust_decimal::Decimal;

use uniswap_trigger_bot::domain::price::{minimum_output, to_wei, PriceQuote};

const ONE_ETH_WEI: u128 = 1_000_000_000_000_000_000;

// ── Quote Conversion Properties ─────────────────────────────

proptest! {
    /// Converting raw wei to a quote and scaling back must be lossless.
    #[test]
    fn quote_conversion_round_trips(raw in 1u128..1_000_000_000_000_000_000_000_000) {
        let quote = PriceQuote::from_wei(raw).unwrap();
        prop_assert_eq!(to_wei(quote.price).unwrap(), raw);
    }

    /// Whole-unit raw amounts convert to whole decimal prices.
    #[test]
    fn whole_units_have_no_fraction(units in 1u64..1_000_000) {
        let quote = PriceQuote::from_wei(u128::from(units) * ONE_ETH_WEI).unwrap();
        prop_assert_eq!(quote.price, Decimal::from(units));
    }

    /// The threshold comparison agrees with plain decimal ordering.
    #[test]
    fn threshold_comparison_matches_ordering(
        raw in 1u128..1_000_000_000_000_000_000_000_000,
        threshold_units in 1u32..10_000,
    ) {
        let quote = PriceQuote::from_wei(raw).unwrap();
        let threshold = Decimal::from(threshold_units);
        prop_assert_eq!(quote.at_or_below(threshold), quote.price <= threshold);
    }
}

// ── Minimum Output Properties ───────────────────────────────

proptest! {
    /// Slippage tolerance can only lower the minimum output.
    #[test]
    fn slippage_never_raises_minimum(
        units in 1u64..100_000,
        input in 1u128..ONE_ETH_WEI,
        bps in 0u32..10_000,
    ) {
        let price = Decimal::from(units);
        let raw = minimum_output(price, input, 0).unwrap();
        let tolerant = minimum_output(price, input, bps).unwrap();
        prop_assert!(tolerant <= raw);
    }

    /// Zero slippage reproduces the quoted amount exactly.
    #[test]
    fn zero_slippage_is_identity(
        units in 1u64..100_000,
        input in 1u128..ONE_ETH_WEI,
    ) {
        let price = Decimal::from(units);
        let min = minimum_output(price, input, 0).unwrap();
        prop_assert_eq!(min, u128::from(units) * input);
    }

    /// Minimum output grows with the input amount.
    #[test]
    fn minimum_output_monotonic_in_input(
        units in 1u64..100_000,
        input in 1u128..ONE_ETH_WEI,
        extra in 1u128..ONE_ETH_WEI,
    ) {
        let price = Decimal::from(units);
        let smaller = minimum_output(price, input, 0).unwrap();
        let larger = minimum_output(price, input + extra, 0).unwrap();
        prop_assert!(larger > smaller);
    }
}

// ── Quote/Minimum-Output Consistency ────────────────────────

proptest! {
    /// A quote converted from wei and fed straight back into the
    /// minimum-output derivation reproduces the original ratio.
    #[test]
    fn quoted_price_scales_linearly(units in 1u64..100_000) {
        let quote = PriceQuote::from_wei(u128::from(units) * ONE_ETH_WEI).unwrap();
        let min = minimum_output(quote.price, ONE_ETH_WEI / 100, 0).unwrap();
        prop_assert_eq!(min, u128::from(units) * (ONE_ETH_WEI / 100));
    }
}
