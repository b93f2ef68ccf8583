//! Property tests over whole rounds.

use proptest::prelude::*;
use scatter_core::WalletBackend;
use scatter_engine::{EngineConfig, ScatterPolicy};
use scatter_tests::helpers::*;

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Over several rounds no account ever scatters to itself, funds never
    /// leave the pool, and every scatter stays within the policy bounds.
    #[test]
    fn rounds_conserve_funds_and_avoid_self_transfers(
        n in 2u32..6,
        seed in any::<u64>(),
        uniform in any::<bool>(),
    ) {
        let policy = if uniform { ScatterPolicy::Uniform } else { ScatterPolicy::Legacy };
        let config = EngineConfig { scatter_policy: policy, ..small_pool(n) };
        let mut s = scheduler_with_source(config.clone(), coins(1_000), seed);

        let own: Vec<Vec<String>> = block_on(async {
            for _ in 0..4 {
                s.run_once().await.unwrap();
                s.backend().confirm_all();
            }
            let mut own = Vec::new();
            for account in config.accounts() {
                own.push(s.backend().get_addresses_by_account(account.name()).await.unwrap());
            }
            own
        });

        let mut total = s.backend().confirmed_balance("main");
        for account in config.accounts() {
            total = total.saturating_add(s.backend().confirmed_balance(account.name()));
        }
        prop_assert_eq!(total, coins(1_000));

        for send in s.backend().sends().into_iter().filter(|s| s.source != "main") {
            let seq: usize = send.source.trim_start_matches("sb-").parse().unwrap();
            prop_assert!(!own[seq - 1].contains(&send.destination));
            prop_assert!(send.amount >= amount("0.01"));
            prop_assert!(send.amount <= amount("0.25"));
        }
    }
}
