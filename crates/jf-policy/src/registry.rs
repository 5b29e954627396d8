//! Policy registry
//!
//! Indexes contribution and reward formulas by policy key. Wiring
//! problems (duplicate keys, a key with no formula) are startup errors;
//! a config entry naming an unregistered key is a configuration bug, not
//! a request failure.

use std::collections::HashMap;
use std::sync::Arc;

use jf_core::PolicyKey;

use crate::contribution::{ContributionFormula, FixedContribution, VariableContribution};
use crate::error::{FormulaKind, PolicyError, PolicyResult};
use crate::random::RandomSource;
use crate::reward::{FixedReward, RewardFormula, VariableReward};

/// Formula index, one map per kind.
pub struct PolicyRegistry {
    contributions: HashMap<PolicyKey, Arc<dyn ContributionFormula>>,
    rewards: HashMap<PolicyKey, Arc<dyn RewardFormula>>,
}

impl PolicyRegistry {
    /// Empty registry, for custom wiring in tests.
    pub fn empty() -> Self {
        Self {
            contributions: HashMap::new(),
            rewards: HashMap::new(),
        }
    }

    /// Build the production registry with the built-in formulas, drawing
    /// reward rolls from `random`. Validates coverage before returning.
    pub fn with_random(random: Arc<dyn RandomSource>) -> PolicyResult<Self> {
        let mut registry = Self::empty();
        registry.register_contribution(Arc::new(FixedContribution))?;
        registry.register_contribution(Arc::new(VariableContribution))?;
        registry.register_reward(Arc::new(FixedReward::new(random.clone())))?;
        registry.register_reward(Arc::new(VariableReward::new(random)))?;
        registry.validate()?;
        Ok(registry)
    }

    /// Register a contribution formula. Duplicate keys are a startup error.
    pub fn register_contribution(
        &mut self,
        formula: Arc<dyn ContributionFormula>,
    ) -> PolicyResult<()> {
        let key = formula.policy_key();
        if self.contributions.insert(key, formula).is_some() {
            return Err(PolicyError::DuplicateFormula {
                kind: FormulaKind::Contribution,
                key,
            });
        }
        Ok(())
    }

    /// Register a reward formula. Duplicate keys are a startup error.
    pub fn register_reward(&mut self, formula: Arc<dyn RewardFormula>) -> PolicyResult<()> {
        let key = formula.policy_key();
        if self.rewards.insert(key, formula).is_some() {
            return Err(PolicyError::DuplicateFormula {
                kind: FormulaKind::Reward,
                key,
            });
        }
        Ok(())
    }

    /// Look up the contribution formula for `key`.
    pub fn contribution(&self, key: PolicyKey) -> PolicyResult<Arc<dyn ContributionFormula>> {
        self.contributions
            .get(&key)
            .cloned()
            .ok_or(PolicyError::MissingFormula {
                kind: FormulaKind::Contribution,
                key,
            })
    }

    /// Look up the reward formula for `key`.
    pub fn reward(&self, key: PolicyKey) -> PolicyResult<Arc<dyn RewardFormula>> {
        self.rewards
            .get(&key)
            .cloned()
            .ok_or(PolicyError::MissingFormula {
                kind: FormulaKind::Reward,
                key,
            })
    }

    /// Assert that every policy key has exactly one formula of each kind.
    pub fn validate(&self) -> PolicyResult<()> {
        for key in PolicyKey::ALL {
            if !self.contributions.contains_key(&key) {
                return Err(PolicyError::MissingFormula {
                    kind: FormulaKind::Contribution,
                    key,
                });
            }
            if !self.rewards.contains_key(&key) {
                return Err(PolicyError::MissingFormula {
                    kind: FormulaKind::Reward,
                    key,
                });
            }
        }
        Ok(())
    }
}
