//! # jf-engine — jackpot coordination services
//!
//! The two pipelines that make the jackpot safe under concurrency:
//!
//! - [`ContributionService`] consumes bet events, producing at most one
//!   contribution row per bet and a monotonic pool update;
//! - [`EvaluationService`] decides wins, enforcing one winner per cycle
//!   through pessimistic finalization, and resets the pool.
//!
//! The services talk only through the repository contracts; there is no
//! shared in-process jackpot state. [`ingest::IngestPool`] models the
//! bus-consumer side: per-jackpot FIFO queues with at-least-once
//! redelivery.

pub mod contribution;
pub mod error;
pub mod evaluation;
pub mod ingest;
pub mod outcome;
pub mod response;

pub use contribution::ContributionService;
pub use error::{EngineError, EngineResult};
pub use evaluation::{EvaluationConfig, EvaluationService};
pub use ingest::{IngestConfig, IngestPool};
pub use outcome::Outcome;
pub use response::EvaluateResponse;
