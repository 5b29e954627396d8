//! Reward formulas
//!
//! A reward formula decides whether the bet under evaluation wins the
//! pool. The draw `u` comes from the injected [`RandomSource`] and the
//! bet wins iff `u < effectiveChance`, with the chance read from the
//! parameter blob. The draw is compared as `f64`.

use std::sync::Arc;

use jf_core::{Jackpot, PolicyKey};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::curve::interpolate_percent;
use crate::params::PolicyParams;
use crate::random::RandomSource;

/// Decides a win against the current jackpot state.
pub trait RewardFormula: Send + Sync {
    /// Key this formula implements.
    fn policy_key(&self) -> PolicyKey;

    /// Roll for a win. A blank or malformed blob never wins.
    fn is_winner(&self, jackpot: &Jackpot, params: &PolicyParams) -> bool;
}

fn roll_wins(random: &dyn RandomSource, chance: Decimal) -> bool {
    let u = random.draw_percent();
    u < chance.to_f64().unwrap_or(0.0)
}

/// Flat winning chance.
///
/// Parameters: `chancePercent` (0..100, clamped).
pub struct FixedReward {
    random: Arc<dyn RandomSource>,
}

impl FixedReward {
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self { random }
    }
}

impl RewardFormula for FixedReward {
    fn policy_key(&self) -> PolicyKey {
        PolicyKey::Fixed
    }

    fn is_winner(&self, _jackpot: &Jackpot, params: &PolicyParams) -> bool {
        roll_wins(self.random.as_ref(), params.percent("chancePercent"))
    }
}

/// Winning chance interpolated over the pool value.
///
/// Parameters: `startPercent`, `endPercent` (clamped), `fromPool`
/// (default 0), `toPool`. A pool at or past `toPool` is a guaranteed win.
pub struct VariableReward {
    random: Arc<dyn RandomSource>,
}

impl VariableReward {
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self { random }
    }
}

impl RewardFormula for VariableReward {
    fn policy_key(&self) -> PolicyKey {
        PolicyKey::Variable
    }

    fn is_winner(&self, jackpot: &Jackpot, params: &PolicyParams) -> bool {
        let pool = jackpot.current_amount;
        let from_pool = params.pool_threshold("fromPool");
        let to_pool = params.pool_threshold("toPool");

        // past the ceiling the pool must be paid out
        if to_pool > from_pool && pool >= to_pool {
            return true;
        }
        let chance = interpolate_percent(
            pool,
            params.percent("startPercent"),
            params.percent("endPercent"),
            from_pool,
            to_pool,
        );
        roll_wins(self.random.as_ref(), chance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ScriptedSource, SeededSource};

    fn jackpot_with_pool(pool: &str) -> Jackpot {
        let mut j = Jackpot::new(1, "Test", "c1", "10000.00".parse().unwrap());
        j.current_amount = pool.parse().unwrap();
        j
    }

    fn fixed_with_rolls(rolls: &[f64]) -> FixedReward {
        FixedReward::new(Arc::new(ScriptedSource::new(rolls.to_vec(), 99.9)))
    }

    #[test]
    fn test_fixed_roll_below_chance_wins() {
        let formula = fixed_with_rolls(&[5.0]);
        let params = PolicyParams::parse(r#"{"chancePercent": 10}"#);
        assert!(formula.is_winner(&jackpot_with_pool("10000.00"), &params));
    }

    #[test]
    fn test_fixed_roll_at_or_above_chance_loses() {
        let formula = fixed_with_rolls(&[10.0, 95.0]);
        let params = PolicyParams::parse(r#"{"chancePercent": 10}"#);
        assert!(!formula.is_winner(&jackpot_with_pool("10000.00"), &params));
        assert!(!formula.is_winner(&jackpot_with_pool("10000.00"), &params));
    }

    #[test]
    fn test_fixed_blank_blob_never_wins() {
        let formula = fixed_with_rolls(&[0.0]);
        assert!(!formula.is_winner(&jackpot_with_pool("10000.00"), &PolicyParams::parse("")));
    }

    #[test]
    fn test_fixed_chance_clamped_to_hundred() {
        let formula = fixed_with_rolls(&[99.999]);
        let params = PolicyParams::parse(r#"{"chancePercent": 700}"#);
        assert!(formula.is_winner(&jackpot_with_pool("10000.00"), &params));
    }

    #[test]
    fn test_variable_guaranteed_win_at_to_pool() {
        // even a 99.999 roll wins once the pool reaches the ceiling
        let formula = VariableReward::new(Arc::new(ScriptedSource::new([99.999], 99.999)));
        let params =
            PolicyParams::parse(r#"{"startPercent": 1, "endPercent": 50, "fromPool": 10000, "toPool": 50000}"#);
        assert!(formula.is_winner(&jackpot_with_pool("50000.00"), &params));
        assert!(formula.is_winner(&jackpot_with_pool("80000.00"), &params));
    }

    #[test]
    fn test_variable_below_from_pool_uses_start_chance() {
        let formula = VariableReward::new(Arc::new(ScriptedSource::new([0.5, 1.5], 0.0)));
        let params =
            PolicyParams::parse(r#"{"startPercent": 1, "endPercent": 50, "fromPool": 10000, "toPool": 50000}"#);
        assert!(formula.is_winner(&jackpot_with_pool("5000.00"), &params));
        assert!(!formula.is_winner(&jackpot_with_pool("5000.00"), &params));
    }

    #[test]
    fn test_variable_interpolates_chance() {
        // halfway through the span the chance is 25.5
        let formula = VariableReward::new(Arc::new(ScriptedSource::new([25.0, 26.0], 0.0)));
        let params =
            PolicyParams::parse(r#"{"startPercent": 1, "endPercent": 50, "fromPool": 10000, "toPool": 50000}"#);
        assert!(formula.is_winner(&jackpot_with_pool("30000.00"), &params));
        assert!(!formula.is_winner(&jackpot_with_pool("30000.00"), &params));
    }

    #[test]
    fn test_variable_degenerate_range_never_guarantees() {
        let formula = VariableReward::new(Arc::new(ScriptedSource::new([50.0], 50.0)));
        let params = PolicyParams::parse(r#"{"startPercent": 10, "endPercent": 90, "fromPool": 5000, "toPool": 5000}"#);
        // degenerate range reduces to the start chance of 10
        assert!(!formula.is_winner(&jackpot_with_pool("9000.00"), &params));
    }

    #[test]
    fn test_win_rate_converges_to_chance() {
        let formula = FixedReward::new(Arc::new(SeededSource::new(7)));
        let params = PolicyParams::parse(r#"{"chancePercent": 30}"#);
        let jackpot = jackpot_with_pool("10000.00");

        let draws = 10_000;
        let wins = (0..draws)
            .filter(|_| formula.is_winner(&jackpot, &params))
            .count();
        let rate = wins as f64 / draws as f64 * 100.0;
        assert!(
            (25.0..35.0).contains(&rate),
            "win rate {rate:.2}% strayed from the configured 30%"
        );
    }
}
