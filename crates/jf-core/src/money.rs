//! Fixed-scale decimal money helpers
//!
//! All monetary values are `rust_decimal::Decimal` with persistence scale 2.
//! Intermediate formula math may carry more digits; results are rounded
//! half-up before they touch a row.

use rust_decimal::{Decimal, RoundingStrategy};

/// Persistence scale for monetary columns.
pub const MONEY_SCALE: u32 = 2;

/// Minimum scale for intermediate interpolation math.
pub const INTERIM_SCALE: u32 = 8;

/// Round half-up to `scale`, padding the result to exactly that scale.
///
/// Monetary values in the engine are non-negative, so midpoint-away-from-zero
/// is half-up.
pub fn round_half_up(value: Decimal, scale: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    // round_dp never pads, it only trims digits
    rounded.rescale(scale);
    rounded
}

/// Zero at persistence scale (`0.00`).
pub fn zero_money() -> Decimal {
    Decimal::new(0, MONEY_SCALE)
}
