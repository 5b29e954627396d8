//! Persisted entities of the jackpot engine
//!
//! Rows reference each other by id only; the store hands out the config
//! graph alongside a jackpot so no further fetch is needed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{BetId, JackpotId, UserId};

/// Policy key selecting which formula implements a config slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyKey {
    Fixed,
    Variable,
}

impl PolicyKey {
    /// Every key the registry must cover.
    pub const ALL: [PolicyKey; 2] = [PolicyKey::Fixed, PolicyKey::Variable];

    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKey::Fixed => "FIXED",
            PolicyKey::Variable => "VARIABLE",
        }
    }
}

impl std::fmt::Display for PolicyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a config entry within a jackpot config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigSlot {
    Contribution,
    Reward,
}

impl ConfigSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigSlot::Contribution => "CONTRIBUTION",
            ConfigSlot::Reward => "REWARD",
        }
    }
}

impl std::fmt::Display for ConfigSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named pool that grows with contributions and resets on a win.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jackpot {
    pub jackpot_id: JackpotId,
    pub name: String,
    /// Natural key of the owning [`JackpotConfig`].
    pub config_id: String,
    /// Pool value the jackpot resets to after a win.
    pub initial_amount: Decimal,
    /// Live pool value.
    pub current_amount: Decimal,
    /// Completed pool lifetimes; one cycle ends when a bet wins.
    pub cycle: u64,
    /// Optimistic-lock counter, bumped on every persisted update.
    pub version: u64,
}

impl Jackpot {
    pub fn new(
        jackpot_id: JackpotId,
        name: impl Into<String>,
        config_id: impl Into<String>,
        initial_amount: Decimal,
    ) -> Self {
        Self {
            jackpot_id,
            name: name.into(),
            config_id: config_id.into(),
            initial_amount,
            current_amount: initial_amount,
            cycle: 0,
            version: 0,
        }
    }
}

/// One formula binding within a config: a slot, the policy key that fills
/// it, and an opaque JSON parameter blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub entry_id: u64,
    pub config_id: String,
    pub slot: ConfigSlot,
    pub policy_key: PolicyKey,
    /// Free-form JSON object with the formula parameters.
    pub config_blob: String,
}

/// Immutable-after-seed configuration shared across jackpots.
///
/// Owns its entries; at most one entry exists per slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JackpotConfig {
    pub config_id: String,
    pub name: String,
    pub entries: Vec<ConfigEntry>,
}

impl JackpotConfig {
    /// Resolve the entry bound to `slot`, if the seed supplied one.
    pub fn entry(&self, slot: ConfigSlot) -> Option<&ConfigEntry> {
        self.entries.iter().find(|e| e.slot == slot)
    }
}

/// A jackpot together with its config graph, loaded in one fetch.
#[derive(Debug, Clone)]
pub struct JackpotWithConfig {
    pub jackpot: Jackpot,
    pub config: Arc<JackpotConfig>,
}

/// The portion of a bet credited to a jackpot pool.
///
/// `pool_snapshot` and `cycle_snapshot` capture the jackpot the instant
/// before this row was added, which is what later fairness checks compare
/// against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub contribution_id: u64,
    pub bet_id: BetId,
    pub user_id: UserId,
    pub jackpot_id: JackpotId,
    pub stake_amount: Decimal,
    pub contribution_amount: Decimal,
    /// Jackpot `current_amount` immediately before this contribution.
    pub pool_snapshot: Decimal,
    /// Jackpot `cycle` at the moment the contribution was recorded.
    pub cycle_snapshot: u64,
    /// Flipped once, by the first evaluation of this bet.
    pub evaluated: bool,
    /// Flipped at most once, when this bet wins its cycle.
    pub winning: bool,
    pub recorded_at: DateTime<Utc>,
}

/// Insert payload for a contribution row; the store allocates the id and
/// timestamp, flags start false.
#[derive(Debug, Clone)]
pub struct NewContribution {
    pub bet_id: BetId,
    pub user_id: UserId,
    pub jackpot_id: JackpotId,
    pub stake_amount: Decimal,
    pub contribution_amount: Decimal,
    pub pool_snapshot: Decimal,
    pub cycle_snapshot: u64,
}

/// Record of a paid-out cycle. At most one exists per `(jackpot, cycle)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub reward_id: u64,
    pub bet_id: BetId,
    pub user_id: UserId,
    pub jackpot_id: JackpotId,
    /// Pool value observed under the row lock at finalization time.
    pub amount: Decimal,
    pub cycle_at_win: u64,
    pub recorded_at: DateTime<Utc>,
}

/// Insert payload for a reward row.
#[derive(Debug, Clone)]
pub struct NewReward {
    pub bet_id: BetId,
    pub user_id: UserId,
    pub jackpot_id: JackpotId,
    pub amount: Decimal,
    pub cycle_at_win: u64,
}
