//! Bet event delivered from the bus

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{BetId, JackpotId, UserId};

/// A wager targeting a jackpot, as carried on the bet topic.
///
/// Messages are keyed by `jackpot_id`, so the bus delivers per-jackpot
/// events in FIFO order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetEvent {
    pub bet_id: BetId,
    pub user_id: UserId,
    pub jackpot_id: JackpotId,
    pub bet_amount: Decimal,
}

impl BetEvent {
    /// Name the first field that violates the input contract, if any.
    ///
    /// Ids must be strictly positive and the stake must be a positive
    /// amount.
    pub fn invalid_field(&self) -> Option<&'static str> {
        if self.bet_id == 0 {
            Some("betId")
        } else if self.user_id == 0 {
            Some("userId")
        } else if self.jackpot_id == 0 {
            Some("jackpotId")
        } else if self.bet_amount <= Decimal::ZERO {
            Some("betAmount")
        } else {
            None
        }
    }
}
