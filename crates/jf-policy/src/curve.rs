//! Linear interpolation over the pool value
//!
//! Both variable formulas scale a percent between two pool thresholds.
//! The ratio is carried at full precision and the effective percent is
//! rounded once, to interim scale 8. Boundaries are exact: a pool at
//! `from_pool` yields `start`, a pool at `to_pool` yields `end`.

use jf_core::money::{round_half_up, INTERIM_SCALE};
use rust_decimal::Decimal;

/// Effective percent for `pool` on the line from `(from_pool, start)` to
/// `(to_pool, end)`.
///
/// Degenerate ranges (`to_pool <= from_pool`) and pools at or below the
/// lower threshold collapse to `start`; pools at or past the upper
/// threshold yield `end`.
pub fn interpolate_percent(
    pool: Decimal,
    start: Decimal,
    end: Decimal,
    from_pool: Decimal,
    to_pool: Decimal,
) -> Decimal {
    if to_pool <= from_pool || pool <= from_pool {
        return start;
    }
    if pool >= to_pool {
        return end;
    }
    let ratio = (pool - from_pool) / (to_pool - from_pool);
    round_half_up(start + (end - start) * ratio, INTERIM_SCALE)
}
