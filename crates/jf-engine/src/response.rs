//! Evaluation response DTO

use jf_core::money::zero_money;
use jf_core::{BetId, JackpotId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::outcome::Outcome;

/// Result of one evaluation request, as returned to the transport layer.
///
/// `payout` is zero on every non-winning outcome. `message` always opens
/// with the stable category token, then `": "` and detail text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateResponse {
    pub bet_id: BetId,
    pub jackpot_id: Option<JackpotId>,
    pub user_id: Option<UserId>,
    pub payout: Decimal,
    pub outcome: Outcome,
    pub message: String,
}

impl EvaluateResponse {
    /// Winning response paying the pool.
    pub fn win(bet_id: BetId, jackpot_id: JackpotId, user_id: UserId, payout: Decimal) -> Self {
        Self {
            bet_id,
            jackpot_id: Some(jackpot_id),
            user_id: Some(user_id),
            payout,
            outcome: Outcome::Win,
            message: format!("win: bet {bet_id} pays {payout} from jackpot {jackpot_id}"),
        }
    }

    /// Recovered non-winning response in the given category.
    pub fn zero(
        bet_id: BetId,
        jackpot_id: Option<JackpotId>,
        user_id: Option<UserId>,
        outcome: Outcome,
        detail: impl AsRef<str>,
    ) -> Self {
        Self {
            bet_id,
            jackpot_id,
            user_id,
            payout: zero_money(),
            outcome,
            message: format!("{}: {}", outcome.as_str(), detail.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_message_prefix() {
        let response = EvaluateResponse::win(101, 1, 50, Decimal::new(1005000, 2));
        assert!(response.outcome.is_win());
        assert!(response.message.starts_with("win: "));
        assert_eq!(response.payout, Decimal::new(1005000, 2));
    }

    #[test]
    fn test_zero_message_prefix_carries_category() {
        let response = EvaluateResponse::zero(
            999,
            None,
            None,
            Outcome::PendingIngestion,
            "no contribution for bet 999",
        );
        assert_eq!(response.payout, Decimal::ZERO);
        assert!(response.message.starts_with("pending-ingestion: "));
    }

    #[test]
    fn test_wire_field_names() {
        let response = EvaluateResponse::win(101, 1, 50, Decimal::new(1005000, 2));
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("betId").is_some());
        assert!(json.get("jackpotId").is_some());
        assert!(json.get("payout").is_some());
        assert!(json.get("message").is_some());
    }
}
