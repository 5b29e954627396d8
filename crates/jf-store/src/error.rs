//! Store errors

use jf_core::{BetId, JackpotId};
use thiserror::Error;

/// Failures surfaced by the repository layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("jackpot {0} does not exist")]
    JackpotNotFound(JackpotId),

    #[error("contribution {0} does not exist")]
    ContributionNotFound(u64),

    #[error("a contribution already exists for bet {bet_id}")]
    DuplicateBetId { bet_id: BetId },

    #[error("a reward already exists for bet {bet_id}")]
    DuplicateRewardBet { bet_id: BetId },

    #[error("cycle {cycle} of jackpot {jackpot_id} is already rewarded")]
    DuplicateCycleReward { jackpot_id: JackpotId, cycle: u64 },

    #[error("version conflict on jackpot {jackpot_id}: expected {expected}, found {found}")]
    VersionConflict {
        jackpot_id: JackpotId,
        expected: u64,
        found: u64,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;
