//! Deploy dataset
//!
//! Four jackpots, one per policy pairing, all opening at 10000.00 on
//! cycle 0. The blobs mirror what operators seed in production config.

use jf_core::{ConfigEntry, ConfigSlot, Jackpot, JackpotConfig, PolicyKey};
use rust_decimal::Decimal;
use serde_json::json;

use crate::memory::MemoryStore;

/// Pool value every seeded jackpot opens with.
pub fn initial_amount() -> Decimal {
    Decimal::new(1000000, 2)
}

fn contribution_blob(key: PolicyKey) -> String {
    match key {
        PolicyKey::Fixed => json!({ "percent": 20, "scale": 2 }),
        PolicyKey::Variable => json!({
            "startPercent": 1,
            "endPercent": 5,
            "fromPool": 10000,
            "toPool": 100000,
            "scale": 2
        }),
    }
    .to_string()
}

fn reward_blob(key: PolicyKey) -> String {
    match key {
        PolicyKey::Fixed => json!({ "chancePercent": 10 }),
        PolicyKey::Variable => json!({
            "startPercent": "0.5",
            "endPercent": 100,
            "fromPool": 10000,
            "toPool": 250000
        }),
    }
    .to_string()
}

fn pairing_config(
    entry_base: u64,
    contribution_key: PolicyKey,
    reward_key: PolicyKey,
) -> JackpotConfig {
    let config_id = format!(
        "{}-{}",
        contribution_key.as_str().to_lowercase(),
        reward_key.as_str().to_lowercase()
    );
    JackpotConfig {
        config_id: config_id.clone(),
        name: format!("{contribution_key}/{reward_key}"),
        entries: vec![
            ConfigEntry {
                entry_id: entry_base,
                config_id: config_id.clone(),
                slot: ConfigSlot::Contribution,
                policy_key: contribution_key,
                config_blob: contribution_blob(contribution_key),
            },
            ConfigEntry {
                entry_id: entry_base + 1,
                config_id,
                slot: ConfigSlot::Reward,
                policy_key: reward_key,
                config_blob: reward_blob(reward_key),
            },
        ],
    }
}

/// Provision the deploy dataset into `store`.
pub fn seed_default(store: &MemoryStore) {
    let pairings = [
        ("Mini", PolicyKey::Fixed, PolicyKey::Fixed),
        ("Minor", PolicyKey::Fixed, PolicyKey::Variable),
        ("Major", PolicyKey::Variable, PolicyKey::Variable),
        ("Grand", PolicyKey::Variable, PolicyKey::Fixed),
    ];

    for (index, (name, contribution_key, reward_key)) in pairings.into_iter().enumerate() {
        let jackpot_id = index as u64 + 1;
        let config = pairing_config(jackpot_id * 10, contribution_key, reward_key);
        store.insert_jackpot(Jackpot::new(
            jackpot_id,
            name,
            config.config_id.clone(),
            initial_amount(),
        ));
        store.insert_config(config);
    }
}
