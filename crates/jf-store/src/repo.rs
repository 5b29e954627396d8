//! Repository contracts the engine consumes
//!
//! These traits describe exactly the persistence operations the
//! contribution and evaluation pipelines need. Config entries are read
//! through the `JackpotConfig` graph returned with the jackpot, never
//! fetched separately.

use jf_core::{
    BetId, Contribution, Jackpot, JackpotId, JackpotWithConfig, NewContribution, NewReward, Reward,
};

use crate::error::StoreResult;

/// A jackpot row held under a pessimistic write lock.
///
/// Competing writers (optimistic saves included) block until the guard
/// drops. Dropping without [`update`](LockedJackpot::update) releases the
/// row unchanged.
pub trait LockedJackpot {
    /// The row as it stands under the lock.
    fn get(&self) -> &Jackpot;

    /// Write the row back, advancing its version.
    fn update(&mut self, jackpot: Jackpot);
}

/// Access to jackpot rows.
pub trait JackpotRepository: Send + Sync {
    /// Load a jackpot with its config graph attached, or `None` when the
    /// jackpot (or the config it references) is missing.
    fn find_by_id_with_config(&self, jackpot_id: JackpotId) -> Option<JackpotWithConfig>;

    /// Acquire the row under a pessimistic write lock.
    fn find_by_id_for_update(&self, jackpot_id: JackpotId) -> Option<Box<dyn LockedJackpot>>;

    /// Persist with optimistic concurrency keyed on `version`. A stale
    /// version fails with [`StoreError::VersionConflict`].
    ///
    /// [`StoreError::VersionConflict`]: crate::StoreError::VersionConflict
    fn save(&self, jackpot: &Jackpot) -> StoreResult<()>;
}

/// Access to contribution rows.
pub trait ContributionRepository: Send + Sync {
    fn find_by_bet_id(&self, bet_id: BetId) -> Option<Contribution>;

    /// Insert a new row. The unique constraint on `bet_id` is enforced at
    /// the storage layer.
    fn insert(&self, new: NewContribution) -> StoreResult<Contribution>;

    /// Persist flag changes (`evaluated`, `winning`) on an existing row.
    fn save(&self, contribution: &Contribution) -> StoreResult<()>;

    /// Remove a row. Only used to compensate an aborted unit of work.
    fn delete(&self, contribution_id: u64) -> StoreResult<()>;
}

/// Access to reward rows.
pub trait RewardRepository: Send + Sync {
    /// Whether any reward exists for `(jackpot_id, cycle)`.
    fn exists_for_cycle(&self, jackpot_id: JackpotId, cycle: u64) -> bool;

    /// Insert a new row. Unique on `bet_id` and on
    /// `(jackpot_id, cycle_at_win)`, enforced at the storage layer.
    fn insert(&self, new: NewReward) -> StoreResult<Reward>;
}
