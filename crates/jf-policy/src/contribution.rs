//! Contribution formulas
//!
//! A contribution formula turns a stake and the jackpot state into the
//! amount credited to the pool. Results are non-negative decimals at the
//! scale the blob requests (default 2).

use jf_core::money::round_half_up;
use jf_core::{Jackpot, PolicyKey};
use rust_decimal::Decimal;

use crate::curve::interpolate_percent;
use crate::params::PolicyParams;

/// Computes the pool credit for one bet.
pub trait ContributionFormula: Send + Sync {
    /// Key this formula implements.
    fn policy_key(&self) -> PolicyKey;

    /// Contribution amount for `stake` against the current jackpot state.
    ///
    /// Must be deterministic and non-negative for any parameter blob.
    fn compute(&self, stake: Decimal, jackpot: &Jackpot, params: &PolicyParams) -> Decimal;
}

/// Flat percentage of the stake.
///
/// Parameters: `percent` (0..100, clamped), `scale` (default 2).
pub struct FixedContribution;

impl ContributionFormula for FixedContribution {
    fn policy_key(&self) -> PolicyKey {
        PolicyKey::Fixed
    }

    fn compute(&self, stake: Decimal, _jackpot: &Jackpot, params: &PolicyParams) -> Decimal {
        let percent = params.percent("percent");
        round_half_up(stake * percent / Decimal::ONE_HUNDRED, params.scale())
    }
}

/// Percentage interpolated linearly over the pool value.
///
/// Parameters: `startPercent`, `endPercent` (0..100, clamped), `fromPool`
/// (default 0, clamped non-negative), `toPool`, `scale` (default 2).
/// Below `fromPool` (or for a degenerate range) the start percent applies;
/// at or past `toPool` the end percent applies.
pub struct VariableContribution;

impl ContributionFormula for VariableContribution {
    fn policy_key(&self) -> PolicyKey {
        PolicyKey::Variable
    }

    fn compute(&self, stake: Decimal, jackpot: &Jackpot, params: &PolicyParams) -> Decimal {
        let scale = params.scale();
        let percent = round_half_up(
            interpolate_percent(
                jackpot.current_amount,
                params.percent("startPercent"),
                params.percent("endPercent"),
                params.pool_threshold("fromPool"),
                params.pool_threshold("toPool"),
            ),
            scale,
        );
        round_half_up(stake * percent / Decimal::ONE_HUNDRED, scale)
    }
}
