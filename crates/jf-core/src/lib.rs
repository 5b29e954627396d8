//! # jf-core — JackForge domain model
//!
//! Shared types for the jackpot engine: the persisted entities
//! (jackpots, configs, contributions, rewards), the bet event that
//! feeds the contribution pipeline, and fixed-scale monetary helpers.
//!
//! This crate is pure data. Services live in `jf-engine`, formulas in
//! `jf-policy`, storage in `jf-store`.

pub mod event;
pub mod model;
pub mod money;

pub use event::BetEvent;
pub use model::{
    ConfigEntry, ConfigSlot, Contribution, Jackpot, JackpotConfig, JackpotWithConfig,
    NewContribution, NewReward, PolicyKey, Reward,
};
pub use money::{round_half_up, zero_money, INTERIM_SCALE, MONEY_SCALE};

/// Bet identifier (unique per wager).
pub type BetId = u64;
/// User identifier.
pub type UserId = u64;
/// Jackpot identifier.
pub type JackpotId = u64;
