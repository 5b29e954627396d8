//! Engine errors
//!
//! Only failures that must abort the surrounding operation live here.
//! Recovered conditions (lost rolls, idempotency hits, cycle fairness)
//! are `ZERO` responses, not errors; see [`crate::outcome::Outcome`].

use jf_core::JackpotId;
use jf_policy::PolicyError;
use jf_store::StoreError;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Bet event violated the input contract.
    #[error("invalid bet event: {field} must be positive")]
    InvalidInput { field: &'static str },

    /// The event references a jackpot that was never seeded.
    #[error("jackpot {0} does not exist")]
    JackpotNotFound(JackpotId),

    /// A contribution formula broke its non-negative contract.
    #[error("contribution formula for jackpot {jackpot_id} returned {amount}")]
    NegativeContribution {
        jackpot_id: JackpotId,
        amount: Decimal,
    },

    /// A unique constraint fired where the algorithm proved it could not.
    #[error("integrity violation: {0}")]
    Integrity(String),

    /// Registry wiring or config naming an unregistered policy.
    #[error("policy configuration error: {0}")]
    Policy(#[from] PolicyError),

    /// Storage failure, including optimistic version conflicts that the
    /// bus resolves by redelivery.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The ingest pool is shut down and accepts no more events.
    #[error("ingest pool is shut down")]
    IngestClosed,
}

pub type EngineResult<T> = Result<T, EngineError>;
