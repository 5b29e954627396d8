//! Evaluation pipeline
//!
//! Decides whether a bet wins its jackpot cycle. The pipeline tolerates
//! ingestion lag with a bounded await, keeps every recovered condition a
//! `ZERO` response, and funnels actual wins through a pessimistic
//! critical section that guarantees a single winner per cycle.
//!
//! The reward roll deliberately happens before the row lock: holding the
//! lock across the draw would serialize every evaluator on the jackpot,
//! while the post-lock cycle re-check makes the unlocked roll safe.

use std::sync::Arc;
use std::time::Duration;

use jf_core::{BetId, ConfigSlot, Contribution, NewReward};
use jf_policy::{PolicyParams, PolicyRegistry};
use jf_store::{ContributionRepository, JackpotRepository, RewardRepository};

use crate::error::{EngineError, EngineResult};
use crate::outcome::Outcome;
use crate::response::EvaluateResponse;

/// Timing knobs for the ingestion await loop.
#[derive(Debug, Clone)]
pub struct EvaluationConfig {
    /// First sleep between polls.
    pub initial_backoff: Duration,
    /// Ceiling for a single sleep while doubling.
    pub max_backoff: Duration,
    /// Cumulative budget before giving up with `pending-ingestion`.
    pub await_budget: Duration,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            initial_backoff: Duration::from_millis(50),
            max_backoff: Duration::from_millis(250),
            await_budget: Duration::from_millis(3000),
        }
    }
}

/// Evaluates bets against their jackpot's reward policy.
pub struct EvaluationService {
    jackpots: Arc<dyn JackpotRepository>,
    contributions: Arc<dyn ContributionRepository>,
    rewards: Arc<dyn RewardRepository>,
    registry: Arc<PolicyRegistry>,
    config: EvaluationConfig,
}

impl EvaluationService {
    pub fn new(
        jackpots: Arc<dyn JackpotRepository>,
        contributions: Arc<dyn ContributionRepository>,
        rewards: Arc<dyn RewardRepository>,
        registry: Arc<PolicyRegistry>,
    ) -> Self {
        Self::with_config(
            jackpots,
            contributions,
            rewards,
            registry,
            EvaluationConfig::default(),
        )
    }

    pub fn with_config(
        jackpots: Arc<dyn JackpotRepository>,
        contributions: Arc<dyn ContributionRepository>,
        rewards: Arc<dyn RewardRepository>,
        registry: Arc<PolicyRegistry>,
        config: EvaluationConfig,
    ) -> Self {
        Self {
            jackpots,
            contributions,
            rewards,
            registry,
            config,
        }
    }

    /// Evaluate one bet, paying and resetting the jackpot on a win.
    ///
    /// Never re-pays: per-bet idempotency flags and the cycle fairness
    /// checks resolve every replay or race to a `ZERO` response.
    pub async fn evaluate_and_reward(&self, bet_id: BetId) -> EngineResult<EvaluateResponse> {
        let Some(mut contribution) = self.await_contribution(bet_id).await else {
            return Ok(EvaluateResponse::zero(
                bet_id,
                None,
                None,
                Outcome::PendingIngestion,
                format!(
                    "no contribution for bet {bet_id} within {}ms",
                    self.config.await_budget.as_millis()
                ),
            ));
        };
        let jackpot_id = contribution.jackpot_id;
        let user_id = contribution.user_id;
        let zero = |outcome: Outcome, detail: String| {
            Ok(EvaluateResponse::zero(
                bet_id,
                Some(jackpot_id),
                Some(user_id),
                outcome,
                detail,
            ))
        };

        if contribution.winning {
            return zero(
                Outcome::AlreadyRewarded,
                format!("bet {bet_id} already won cycle {}", contribution.cycle_snapshot),
            );
        }
        if contribution.evaluated {
            return zero(
                Outcome::AlreadyEvaluated,
                format!("bet {bet_id} was evaluated before"),
            );
        }
        contribution.evaluated = true;
        self.contributions.save(&contribution)?;

        let Some(view) = self.jackpots.find_by_id_with_config(jackpot_id) else {
            return zero(
                Outcome::JackpotMissing,
                format!("jackpot {jackpot_id} does not exist"),
            );
        };

        if view.jackpot.cycle != contribution.cycle_snapshot {
            return zero(
                Outcome::CycleClosed,
                format!(
                    "cycle {} closed, jackpot {jackpot_id} is on cycle {}",
                    contribution.cycle_snapshot, view.jackpot.cycle
                ),
            );
        }

        let winner = match view.config.entry(ConfigSlot::Reward) {
            Some(entry) => {
                let formula = self.registry.reward(entry.policy_key)?;
                let params = PolicyParams::parse(&entry.config_blob);
                formula.is_winner(&view.jackpot, &params)
            }
            None => {
                log::warn!(
                    "config {:?} has no reward entry, bet {bet_id} cannot win",
                    view.jackpot.config_id
                );
                false
            }
        };
        if !winner {
            return zero(Outcome::Lose, format!("bet {bet_id} did not win the roll"));
        }

        self.finalize_win(&mut contribution)
    }

    /// Pessimistic critical section for a winning roll.
    fn finalize_win(&self, contribution: &mut Contribution) -> EngineResult<EvaluateResponse> {
        let bet_id = contribution.bet_id;
        let jackpot_id = contribution.jackpot_id;
        let user_id = contribution.user_id;
        let cycle = contribution.cycle_snapshot;

        let Some(mut lock) = self.jackpots.find_by_id_for_update(jackpot_id) else {
            return Ok(EvaluateResponse::zero(
                bet_id,
                Some(jackpot_id),
                Some(user_id),
                Outcome::JackpotMissingUnderLock,
                format!("jackpot {jackpot_id} vanished before finalization"),
            ));
        };

        if lock.get().cycle != cycle {
            return Ok(EvaluateResponse::zero(
                bet_id,
                Some(jackpot_id),
                Some(user_id),
                Outcome::CycleClosed,
                format!(
                    "cycle {cycle} closed under lock, jackpot {jackpot_id} is on cycle {}",
                    lock.get().cycle
                ),
            ));
        }
        if self.rewards.exists_for_cycle(jackpot_id, cycle) {
            return Ok(EvaluateResponse::zero(
                bet_id,
                Some(jackpot_id),
                Some(user_id),
                Outcome::CycleAlreadyRewarded,
                format!("cycle {cycle} of jackpot {jackpot_id} was won concurrently"),
            ));
        }

        let payout = lock.get().current_amount;
        // the checks above proved this insert unique; a violation here is
        // a broken store
        self.rewards
            .insert(NewReward {
                bet_id,
                user_id,
                jackpot_id,
                amount: payout,
                cycle_at_win: cycle,
            })
            .map_err(|err| EngineError::Integrity(err.to_string()))?;

        contribution.winning = true;
        self.contributions.save(contribution)?;

        let mut reset = lock.get().clone();
        reset.current_amount = reset.initial_amount;
        reset.cycle += 1;
        lock.update(reset);
        drop(lock);

        log::info!("bet {bet_id} won jackpot {jackpot_id} cycle {cycle} for {payout}");
        Ok(EvaluateResponse::win(bet_id, jackpot_id, user_id, payout))
    }

    /// Poll for the contribution row until it appears or the budget runs
    /// out. Dropping the future cancels the wait.
    async fn await_contribution(&self, bet_id: BetId) -> Option<Contribution> {
        let deadline = tokio::time::Instant::now() + self.config.await_budget;
        let mut backoff = self.config.initial_backoff;
        loop {
            if let Some(contribution) = self.contributions.find_by_bet_id(bet_id) {
                return Some(contribution);
            }
            let now = tokio::time::Instant::now();
            if now >= deadline {
                log::debug!("bet {bet_id} still absent after the await budget");
                return None;
            }
            tokio::time::sleep(backoff.min(deadline - now)).await;
            backoff = (backoff * 2).min(self.config.max_backoff);
        }
    }
}
