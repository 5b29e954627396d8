//! Contribution pipeline
//!
//! One public operation: consume a bet event, record at most one
//! contribution row for it, and add the computed amount to the pool.
//! The snapshot columns capture the jackpot as it stood the instant
//! before the row, so evaluation can make fairness decisions later
//! without trusting live state.

use std::sync::Arc;

use jf_core::money::zero_money;
use jf_core::{BetEvent, ConfigSlot, Contribution, NewContribution};
use jf_policy::{PolicyParams, PolicyRegistry};
use jf_store::{ContributionRepository, JackpotRepository, StoreError};
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

/// Consumes bet events into contribution rows and pool updates.
pub struct ContributionService {
    jackpots: Arc<dyn JackpotRepository>,
    contributions: Arc<dyn ContributionRepository>,
    registry: Arc<PolicyRegistry>,
}

impl ContributionService {
    pub fn new(
        jackpots: Arc<dyn JackpotRepository>,
        contributions: Arc<dyn ContributionRepository>,
        registry: Arc<PolicyRegistry>,
    ) -> Self {
        Self {
            jackpots,
            contributions,
            registry,
        }
    }

    /// Credit one bet to its jackpot pool.
    ///
    /// Idempotent on `bet_id`: a replayed event returns the existing row
    /// without touching the jackpot. A version conflict on the pool
    /// update aborts the whole operation (the inserted row is compensated
    /// away) and surfaces for the bus to redeliver.
    pub fn contribute(&self, event: &BetEvent) -> EngineResult<Contribution> {
        if let Some(field) = event.invalid_field() {
            return Err(EngineError::InvalidInput { field });
        }

        if let Some(existing) = self.contributions.find_by_bet_id(event.bet_id) {
            log::debug!(
                "bet {} already contributed, returning existing row",
                event.bet_id
            );
            return Ok(existing);
        }

        let view = self
            .jackpots
            .find_by_id_with_config(event.jackpot_id)
            .ok_or(EngineError::JackpotNotFound(event.jackpot_id))?;
        let jackpot = view.jackpot;

        let amount = match view.config.entry(ConfigSlot::Contribution) {
            Some(entry) => {
                let formula = self.registry.contribution(entry.policy_key)?;
                let params = PolicyParams::parse(&entry.config_blob);
                formula.compute(event.bet_amount, &jackpot, &params)
            }
            None => {
                log::warn!(
                    "config {:?} has no contribution entry, crediting nothing",
                    jackpot.config_id
                );
                zero_money()
            }
        };
        if amount < Decimal::ZERO {
            return Err(EngineError::NegativeContribution {
                jackpot_id: jackpot.jackpot_id,
                amount,
            });
        }

        let pool_before = jackpot.current_amount;
        let row = match self.contributions.insert(NewContribution {
            bet_id: event.bet_id,
            user_id: event.user_id,
            jackpot_id: event.jackpot_id,
            stake_amount: event.bet_amount,
            contribution_amount: amount,
            pool_snapshot: pool_before,
            cycle_snapshot: jackpot.cycle,
        }) {
            Ok(row) => row,
            Err(StoreError::DuplicateBetId { bet_id }) => {
                // lost a duplicate race; adopt whatever the winner wrote
                log::debug!("bet {bet_id} raced a concurrent duplicate, re-reading");
                return self.contributions.find_by_bet_id(bet_id).ok_or_else(|| {
                    EngineError::Integrity(format!(
                        "contribution for bet {bet_id} vanished after duplicate insert"
                    ))
                });
            }
            Err(err) => return Err(err.into()),
        };

        let mut updated = jackpot;
        updated.current_amount = pool_before + amount;
        if let Err(err) = self.jackpots.save(&updated) {
            // abort: take the row back out so redelivery replays cleanly
            if let Err(delete_err) = self.contributions.delete(row.contribution_id) {
                log::warn!(
                    "failed to compensate contribution {} after conflict: {delete_err}",
                    row.contribution_id
                );
            }
            return Err(err.into());
        }

        log::info!(
            "bet {} contributed {} to jackpot {} (pool {} -> {})",
            event.bet_id,
            amount,
            event.jackpot_id,
            pool_before,
            updated.current_amount
        );
        Ok(row)
    }
}
