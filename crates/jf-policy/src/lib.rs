//! # jf-policy — formulas and the policy registry
//!
//! Pluggable contribution and reward policies for the jackpot engine.
//! Formulas are stateless singletons indexed by [`jf_core::PolicyKey`];
//! their parameters arrive per call as an opaque JSON blob parsed
//! leniently, so malformed operator configuration degrades to a zero
//! contribution or a non-winner instead of failing requests.

pub mod contribution;
pub mod curve;
pub mod error;
pub mod params;
pub mod random;
pub mod registry;
pub mod reward;

pub use contribution::{ContributionFormula, FixedContribution, VariableContribution};
pub use error::{FormulaKind, PolicyError, PolicyResult};
pub use params::PolicyParams;
pub use random::{EntropySource, RandomSource, ScriptedSource, SeededSource};
pub use registry::PolicyRegistry;
pub use reward::{FixedReward, RewardFormula, VariableReward};
