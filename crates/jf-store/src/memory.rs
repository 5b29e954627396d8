//! In-memory store engine
//!
//! Backs the repository contracts with parking_lot-guarded tables.
//! Jackpot rows live behind their own `Arc<Mutex<..>>` so the optimistic
//! CAS and the pessimistic row lock compose the way they do on a
//! relational store: a save racing a held lock blocks, then fails its
//! version check.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use jf_core::{
    BetId, Contribution, Jackpot, JackpotConfig, JackpotId, JackpotWithConfig, NewContribution,
    NewReward, Reward,
};
use parking_lot::lock_api::ArcMutexGuard;
use parking_lot::{Mutex, RawMutex, RwLock};

use crate::error::{StoreError, StoreResult};
use crate::repo::{ContributionRepository, JackpotRepository, LockedJackpot, RewardRepository};

#[derive(Default)]
struct ContributionTable {
    rows: HashMap<u64, Contribution>,
    by_bet: HashMap<BetId, u64>,
}

#[derive(Default)]
struct RewardTable {
    rows: Vec<Reward>,
    by_bet: HashSet<BetId>,
    by_cycle: HashSet<(JackpotId, u64)>,
}

/// Process-local store implementing every repository contract.
#[derive(Default)]
pub struct MemoryStore {
    jackpots: RwLock<HashMap<JackpotId, Arc<Mutex<Jackpot>>>>,
    configs: RwLock<HashMap<String, Arc<JackpotConfig>>>,
    contributions: RwLock<ContributionTable>,
    rewards: RwLock<RewardTable>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            ..Self::default()
        }
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Seed-time wiring: register a config graph.
    pub fn insert_config(&self, config: JackpotConfig) {
        self.configs
            .write()
            .insert(config.config_id.clone(), Arc::new(config));
    }

    /// Seed-time wiring: register a jackpot row.
    pub fn insert_jackpot(&self, jackpot: Jackpot) {
        self.jackpots
            .write()
            .insert(jackpot.jackpot_id, Arc::new(Mutex::new(jackpot)));
    }

    /// Snapshot of a jackpot row, for inspection in tests and tooling.
    pub fn jackpot(&self, jackpot_id: JackpotId) -> Option<Jackpot> {
        let row = self.jackpots.read().get(&jackpot_id).cloned()?;
        let snapshot = row.lock().clone();
        Some(snapshot)
    }

    /// All reward rows, insertion-ordered.
    pub fn rewards(&self) -> Vec<Reward> {
        self.rewards.read().rows.clone()
    }

    /// Number of contribution rows.
    pub fn contribution_count(&self) -> usize {
        self.contributions.read().rows.len()
    }

    fn row(&self, jackpot_id: JackpotId) -> Option<Arc<Mutex<Jackpot>>> {
        self.jackpots.read().get(&jackpot_id).cloned()
    }
}

struct MemoryLockedJackpot {
    guard: ArcMutexGuard<RawMutex, Jackpot>,
}

impl LockedJackpot for MemoryLockedJackpot {
    fn get(&self) -> &Jackpot {
        &self.guard
    }

    fn update(&mut self, jackpot: Jackpot) {
        let next_version = self.guard.version + 1;
        *self.guard = jackpot;
        self.guard.version = next_version;
    }
}

impl JackpotRepository for MemoryStore {
    fn find_by_id_with_config(&self, jackpot_id: JackpotId) -> Option<JackpotWithConfig> {
        let jackpot = self.jackpot(jackpot_id)?;
        let config = self.configs.read().get(&jackpot.config_id).cloned();
        match config {
            Some(config) => Some(JackpotWithConfig { jackpot, config }),
            None => {
                // a jackpot row must always reference a seeded config
                log::warn!(
                    "jackpot {} references unknown config {:?}",
                    jackpot_id,
                    jackpot.config_id
                );
                None
            }
        }
    }

    fn find_by_id_for_update(&self, jackpot_id: JackpotId) -> Option<Box<dyn LockedJackpot>> {
        let row = self.row(jackpot_id)?;
        let guard = row.lock_arc();
        Some(Box::new(MemoryLockedJackpot { guard }))
    }

    fn save(&self, jackpot: &Jackpot) -> StoreResult<()> {
        let row = self
            .row(jackpot.jackpot_id)
            .ok_or(StoreError::JackpotNotFound(jackpot.jackpot_id))?;
        let mut guard = row.lock();
        if guard.version != jackpot.version {
            return Err(StoreError::VersionConflict {
                jackpot_id: jackpot.jackpot_id,
                expected: jackpot.version,
                found: guard.version,
            });
        }
        *guard = jackpot.clone();
        guard.version += 1;
        Ok(())
    }
}

impl ContributionRepository for MemoryStore {
    fn find_by_bet_id(&self, bet_id: BetId) -> Option<Contribution> {
        let table = self.contributions.read();
        let id = table.by_bet.get(&bet_id)?;
        table.rows.get(id).cloned()
    }

    fn insert(&self, new: NewContribution) -> StoreResult<Contribution> {
        let mut table = self.contributions.write();
        if table.by_bet.contains_key(&new.bet_id) {
            return Err(StoreError::DuplicateBetId { bet_id: new.bet_id });
        }
        let contribution = Contribution {
            contribution_id: self.allocate_id(),
            bet_id: new.bet_id,
            user_id: new.user_id,
            jackpot_id: new.jackpot_id,
            stake_amount: new.stake_amount,
            contribution_amount: new.contribution_amount,
            pool_snapshot: new.pool_snapshot,
            cycle_snapshot: new.cycle_snapshot,
            evaluated: false,
            winning: false,
            recorded_at: Utc::now(),
        };
        table.by_bet.insert(new.bet_id, contribution.contribution_id);
        table
            .rows
            .insert(contribution.contribution_id, contribution.clone());
        Ok(contribution)
    }

    fn save(&self, contribution: &Contribution) -> StoreResult<()> {
        let mut table = self.contributions.write();
        match table.rows.get_mut(&contribution.contribution_id) {
            Some(row) => {
                *row = contribution.clone();
                Ok(())
            }
            None => Err(StoreError::ContributionNotFound(
                contribution.contribution_id,
            )),
        }
    }

    fn delete(&self, contribution_id: u64) -> StoreResult<()> {
        let mut table = self.contributions.write();
        let row = table
            .rows
            .remove(&contribution_id)
            .ok_or(StoreError::ContributionNotFound(contribution_id))?;
        table.by_bet.remove(&row.bet_id);
        Ok(())
    }
}

impl RewardRepository for MemoryStore {
    fn exists_for_cycle(&self, jackpot_id: JackpotId, cycle: u64) -> bool {
        self.rewards.read().by_cycle.contains(&(jackpot_id, cycle))
    }

    fn insert(&self, new: NewReward) -> StoreResult<Reward> {
        let mut table = self.rewards.write();
        if table.by_bet.contains(&new.bet_id) {
            return Err(StoreError::DuplicateRewardBet { bet_id: new.bet_id });
        }
        if table.by_cycle.contains(&(new.jackpot_id, new.cycle_at_win)) {
            return Err(StoreError::DuplicateCycleReward {
                jackpot_id: new.jackpot_id,
                cycle: new.cycle_at_win,
            });
        }
        let reward = Reward {
            reward_id: self.allocate_id(),
            bet_id: new.bet_id,
            user_id: new.user_id,
            jackpot_id: new.jackpot_id,
            amount: new.amount,
            cycle_at_win: new.cycle_at_win,
            recorded_at: Utc::now(),
        };
        table.by_bet.insert(new.bet_id);
        table.by_cycle.insert((new.jackpot_id, new.cycle_at_win));
        table.rows.push(reward.clone());
        Ok(reward)
    }
}
