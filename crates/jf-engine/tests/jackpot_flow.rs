//! End-to-end jackpot flow
//!
//! Exercises the contribution and evaluation pipelines together over the
//! seeded deploy dataset (jackpot 1 is FIXED/FIXED: 20 percent
//! contribution, 10 percent win chance, 10000.00 initial pool).

use std::sync::Arc;
use std::time::Duration;

use jf_core::BetEvent;
use jf_engine::{
    ContributionService, EvaluationConfig, EvaluationService, IngestConfig, IngestPool, Outcome,
};
use jf_policy::{PolicyRegistry, ScriptedSource};
use jf_store::{seed, ContributionRepository, MemoryStore, RewardRepository};
use rust_decimal::Decimal;

// ═══════════════════════════════════════════════════════════════════════════════
// FIXTURES
// ═══════════════════════════════════════════════════════════════════════════════

struct Engine {
    store: Arc<MemoryStore>,
    contributions: ContributionService,
    evaluations: EvaluationService,
}

/// Build a seeded engine whose reward rolls replay `rolls`, then lose.
fn engine_with_rolls(rolls: &[f64]) -> Engine {
    let _ = env_logger::builder().is_test(true).try_init();

    let store = Arc::new(MemoryStore::new());
    seed::seed_default(&store);
    let registry = Arc::new(
        PolicyRegistry::with_random(Arc::new(ScriptedSource::new(rolls.to_vec(), 99.9))).unwrap(),
    );
    let contributions = ContributionService::new(store.clone(), store.clone(), registry.clone());
    let evaluations = EvaluationService::with_config(
        store.clone(),
        store.clone(),
        store.clone(),
        registry,
        fast_config(),
    );
    Engine {
        store,
        contributions,
        evaluations,
    }
}

/// Shrunk await budget so absent-contribution paths stay fast.
fn fast_config() -> EvaluationConfig {
    EvaluationConfig {
        initial_backoff: Duration::from_millis(5),
        max_backoff: Duration::from_millis(10),
        await_budget: Duration::from_millis(100),
    }
}

fn bet(bet_id: u64, amount: &str) -> BetEvent {
    BetEvent {
        bet_id,
        user_id: 50,
        jackpot_id: 1,
        bet_amount: amount.parse().unwrap(),
    }
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCENARIOS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_happy_contribute() {
    let engine = engine_with_rolls(&[]);

    let row = engine.contributions.contribute(&bet(101, "250.00")).unwrap();
    assert_eq!(row.contribution_amount, dec("50.00"));
    assert_eq!(row.pool_snapshot, dec("10000.00"));
    assert_eq!(row.cycle_snapshot, 0);

    assert_eq!(engine.store.jackpot(1).unwrap().current_amount, dec("10050.00"));
}

#[test]
fn test_idempotent_contribute_leaves_pool_alone() {
    let engine = engine_with_rolls(&[]);

    let first = engine.contributions.contribute(&bet(101, "250.00")).unwrap();
    let second = engine.contributions.contribute(&bet(101, "250.00")).unwrap();

    assert_eq!(first.contribution_id, second.contribution_id);
    assert_eq!(first.contribution_amount, second.contribution_amount);
    assert_eq!(engine.store.jackpot(1).unwrap().current_amount, dec("10050.00"));
    assert_eq!(engine.store.contribution_count(), 1);
}

#[tokio::test]
async fn test_evaluation_without_contribution_is_pending_ingestion() {
    let engine = engine_with_rolls(&[]);

    let response = engine.evaluations.evaluate_and_reward(999).await.unwrap();
    assert_eq!(response.outcome, Outcome::PendingIngestion);
    assert_eq!(response.payout, Decimal::ZERO);
    assert!(response.message.starts_with("pending-ingestion: "));
    assert_eq!(response.jackpot_id, None);
}

#[tokio::test]
async fn test_losing_roll_then_already_evaluated() {
    let engine = engine_with_rolls(&[95.0]);
    engine.contributions.contribute(&bet(101, "250.00")).unwrap();

    let first = engine.evaluations.evaluate_and_reward(101).await.unwrap();
    assert_eq!(first.outcome, Outcome::Lose);
    assert_eq!(first.payout, Decimal::ZERO);
    assert_eq!(first.jackpot_id, Some(1));

    let second = engine.evaluations.evaluate_and_reward(101).await.unwrap();
    assert_eq!(second.outcome, Outcome::AlreadyEvaluated);
    assert!(second.message.starts_with("already-evaluated: "));

    // no reward and no pool change from the losing evaluations
    assert!(engine.store.rewards().is_empty());
    assert_eq!(engine.store.jackpot(1).unwrap().current_amount, dec("10050.00"));
}

#[tokio::test]
async fn test_winning_roll_pays_pool_and_resets() {
    let engine = engine_with_rolls(&[5.0]);
    engine.contributions.contribute(&bet(101, "250.00")).unwrap();

    let response = engine.evaluations.evaluate_and_reward(101).await.unwrap();
    assert_eq!(response.outcome, Outcome::Win);
    assert_eq!(response.payout, dec("10050.00"));
    assert!(response.message.starts_with("win: "));

    // the jackpot reset into the next cycle
    let jackpot = engine.store.jackpot(1).unwrap();
    assert_eq!(jackpot.current_amount, dec("10000.00"));
    assert_eq!(jackpot.cycle, 1);

    // the reward row records the paid cycle
    let rewards = engine.store.rewards();
    assert_eq!(rewards.len(), 1);
    assert_eq!(rewards[0].bet_id, 101);
    assert_eq!(rewards[0].amount, dec("10050.00"));
    assert_eq!(rewards[0].cycle_at_win, 0);

    // the winning bet can never win again
    let replay = engine.evaluations.evaluate_and_reward(101).await.unwrap();
    assert_eq!(replay.outcome, Outcome::AlreadyRewarded);
    assert_eq!(engine.store.rewards().len(), 1);
}

#[tokio::test]
async fn test_stale_cycle_contribution_is_cycle_closed() {
    let engine = engine_with_rolls(&[5.0]);
    engine.contributions.contribute(&bet(101, "250.00")).unwrap();
    engine.contributions.contribute(&bet(102, "100.00")).unwrap();

    // bet 101 wins and closes cycle 0; payout is the whole pool
    let win = engine.evaluations.evaluate_and_reward(101).await.unwrap();
    assert_eq!(win.outcome, Outcome::Win);
    assert_eq!(win.payout, dec("10070.00"));

    // bet 102 contributed on cycle 0, which no longer exists
    let stale = engine.evaluations.evaluate_and_reward(102).await.unwrap();
    assert_eq!(stale.outcome, Outcome::CycleClosed);
    assert_eq!(stale.payout, Decimal::ZERO);
}

#[tokio::test]
async fn test_raced_cycle_is_cycle_already_rewarded_under_lock() {
    // the roll would win, but another evaluator's reward row for the same
    // cycle is already present when the lock is taken
    let engine = engine_with_rolls(&[5.0]);
    engine.contributions.contribute(&bet(101, "250.00")).unwrap();

    RewardRepository::insert(
        &*engine.store,
        jf_core::NewReward {
            bet_id: 77,
            user_id: 9,
            jackpot_id: 1,
            amount: dec("10000.00"),
            cycle_at_win: 0,
        },
    )
    .unwrap();

    let response = engine.evaluations.evaluate_and_reward(101).await.unwrap();
    assert_eq!(response.outcome, Outcome::CycleAlreadyRewarded);
    assert_eq!(engine.store.rewards().len(), 1);

    // the jackpot was not reset by the refused finalization
    assert_eq!(engine.store.jackpot(1).unwrap().cycle, 0);
}

#[tokio::test]
async fn test_contribution_for_vanished_jackpot_is_jackpot_missing() {
    let engine = engine_with_rolls(&[]);

    // a contribution row whose jackpot was never seeded
    ContributionRepository::insert(
        &*engine.store,
        jf_core::NewContribution {
            bet_id: 500,
            user_id: 50,
            jackpot_id: 42,
            stake_amount: dec("10.00"),
            contribution_amount: dec("2.00"),
            pool_snapshot: dec("10000.00"),
            cycle_snapshot: 0,
        },
    )
    .unwrap();

    let response = engine.evaluations.evaluate_and_reward(500).await.unwrap();
    assert_eq!(response.outcome, Outcome::JackpotMissing);
    assert_eq!(response.payout, Decimal::ZERO);
}

#[tokio::test]
async fn test_bus_to_evaluation_pipeline() {
    let store = Arc::new(MemoryStore::new());
    seed::seed_default(&store);
    let registry = Arc::new(
        PolicyRegistry::with_random(Arc::new(ScriptedSource::new([5.0], 99.9))).unwrap(),
    );
    let contributions = Arc::new(ContributionService::new(
        store.clone(),
        store.clone(),
        registry.clone(),
    ));
    let evaluations = EvaluationService::with_config(
        store.clone(),
        store.clone(),
        store.clone(),
        registry,
        EvaluationConfig {
            await_budget: Duration::from_millis(2000),
            ..fast_config()
        },
    );

    // publish while the evaluator is already waiting on the bet, letting
    // the await loop bridge the ingestion lag
    let pool = IngestPool::start(contributions, IngestConfig::default());
    let waiting = tokio::spawn(async move { evaluations.evaluate_and_reward(101).await });

    pool.publish(bet(101, "250.00")).unwrap();
    let response = waiting.await.unwrap().unwrap();
    pool.shutdown();

    assert_eq!(response.outcome, Outcome::Win);
    assert_eq!(response.payout, dec("10050.00"));
    assert_eq!(store.jackpot(1).unwrap().cycle, 1);
}
