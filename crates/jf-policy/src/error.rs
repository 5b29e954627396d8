//! Policy registry errors

use jf_core::PolicyKey;
use thiserror::Error;

/// Which half of a policy pairing a formula implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormulaKind {
    Contribution,
    Reward,
}

impl std::fmt::Display for FormulaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            FormulaKind::Contribution => "contribution",
            FormulaKind::Reward => "reward",
        })
    }
}

/// Registry wiring errors. These are startup errors, never request errors.
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("duplicate {kind} formula registered for policy key {key}")]
    DuplicateFormula { kind: FormulaKind, key: PolicyKey },

    #[error("no {kind} formula registered for policy key {key}")]
    MissingFormula { kind: FormulaKind, key: PolicyKey },
}

pub type PolicyResult<T> = Result<T, PolicyError>;
