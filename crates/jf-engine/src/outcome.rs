//! Evaluation outcome taxonomy
//!
//! Every evaluation resolves to exactly one category. The string token
//! is stable and machine-parseable; clients and tests branch on it via
//! the response message prefix.

use serde::{Deserialize, Serialize};

/// Category of an evaluation response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    /// The bet won the pool; payout carries the amount.
    Win,
    /// The reward roll did not win.
    Lose,
    /// No contribution arrived within the await budget.
    PendingIngestion,
    /// The bet was evaluated before.
    AlreadyEvaluated,
    /// The bet already won; it cannot be re-evaluated.
    AlreadyRewarded,
    /// The bet's cycle closed before finalization.
    CycleClosed,
    /// Another evaluator won this cycle first, observed under the lock.
    CycleAlreadyRewarded,
    /// The jackpot referenced by the contribution is gone.
    JackpotMissing,
    /// The jackpot vanished between the read and the lock.
    JackpotMissingUnderLock,
}

impl Outcome {
    /// Stable token used as the response message prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Win => "win",
            Outcome::Lose => "lose",
            Outcome::PendingIngestion => "pending-ingestion",
            Outcome::AlreadyEvaluated => "already-evaluated",
            Outcome::AlreadyRewarded => "already-rewarded",
            Outcome::CycleClosed => "cycle-closed",
            Outcome::CycleAlreadyRewarded => "cycle-already-rewarded",
            Outcome::JackpotMissing => "jackpot-missing",
            Outcome::JackpotMissingUnderLock => "jackpot-missing-under-lock",
        }
    }

    pub fn is_win(&self) -> bool {
        matches!(self, Outcome::Win)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_kebab_case() {
        assert_eq!(Outcome::Win.as_str(), "win");
        assert_eq!(Outcome::PendingIngestion.as_str(), "pending-ingestion");
        assert_eq!(Outcome::CycleAlreadyRewarded.as_str(), "cycle-already-rewarded");
    }

    #[test]
    fn test_serde_matches_token() {
        for outcome in [
            Outcome::Win,
            Outcome::Lose,
            Outcome::PendingIngestion,
            Outcome::AlreadyEvaluated,
            Outcome::AlreadyRewarded,
            Outcome::CycleClosed,
            Outcome::CycleAlreadyRewarded,
            Outcome::JackpotMissing,
            Outcome::JackpotMissingUnderLock,
        ] {
            let json = serde_json::to_string(&outcome).unwrap();
            assert_eq!(json, format!("\"{}\"", outcome.as_str()));
        }
    }
}
