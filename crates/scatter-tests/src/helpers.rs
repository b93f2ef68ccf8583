//! Shared test helpers for scenario tests.

use rand::rngs::StdRng;
use rand::SeedableRng;
use scatter_core::Amount;
use scatter_engine::testing::MemoryBackend;
use scatter_engine::{EngineConfig, Scheduler};

/// Whole coins as an [`Amount`].
pub fn coins(n: u64) -> Amount {
    Amount::from_coins(n).unwrap()
}

/// Decimal coin string as an [`Amount`].
pub fn amount(text: &str) -> Amount {
    text.parse().unwrap()
}

/// Small deterministic pool: prefix "sb", stake account "main", fixed
/// stake of 50 (sd 0), threshold 10 and a minimum balance of 100.
pub fn small_pool(n: u32) -> EngineConfig {
    EngineConfig {
        stake_account: "main".to_string(),
        prefix: "sb".to_string(),
        scatter_count: n,
        stake_mean: 50.0,
        stake_sd: 0.0,
        stake_threshold: coins(10),
        min_balance: coins(100),
        ..EngineConfig::default()
    }
}

/// Scheduler over a fresh in-memory wallet with `source` confirmed coins in
/// the stake account.
pub fn scheduler_with_source(
    config: EngineConfig,
    source: Amount,
    seed: u64,
) -> Scheduler<MemoryBackend, StdRng> {
    let backend = MemoryBackend::new();
    backend.fund(&config.stake_account, source);
    Scheduler::new(config, backend, StdRng::seed_from_u64(seed)).unwrap()
}
