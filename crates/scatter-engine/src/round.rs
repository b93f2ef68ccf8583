//! One pass over the scatter pool.

use rand::Rng;
use scatter_core::{KeySource, RoundStats, ScatterAccount, TransferIntent, WalletBackend};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::executor::TransferExecutor;
use crate::planner::{RoundPlanner, ScatterDecision, StakeDecision};
use crate::policy::StakeSampler;

/// Drives the planner and executor across accounts 1..=N.
///
/// Accounts are processed strictly in order and each account's stake is
/// executed before its scatter check. A backend read failure skips the
/// account; a failed send only counts as a failure. Only a fatal
/// [`EngineError`] ends the round early.
pub struct Round<'a, B: ?Sized> {
    planner: RoundPlanner<'a, B>,
    executor: TransferExecutor<'a, B>,
    stats: RoundStats,
}

impl<'a, B: WalletBackend + ?Sized> Round<'a, B> {
    pub fn new(
        config: &'a EngineConfig,
        backend: &'a B,
        keys: &'a dyn KeySource,
        stake: StakeSampler,
    ) -> Self {
        Self {
            planner: RoundPlanner::new(config, backend, keys, stake),
            executor: TransferExecutor::new(backend),
            stats: RoundStats::default(),
        }
    }

    pub async fn run<R: Rng + ?Sized>(mut self, rng: &mut R) -> Result<RoundStats, EngineError> {
        let accounts: Vec<ScatterAccount> = self.planner.accounts().collect();
        for account in accounts {
            match self.process(&account, rng).await {
                Ok(()) => {}
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(account = account.name(), error = %e, "Skipping {account} this round: {e}");
                    self.stats.skipped += 1;
                }
            }
        }
        Ok(self.stats)
    }

    async fn process<R: Rng + ?Sized>(
        &mut self,
        account: &ScatterAccount,
        rng: &mut R,
    ) -> Result<(), EngineError> {
        let address = self.planner.resolve(account).await?;

        let stake = self.planner.plan_stake(account, &address, rng).await?;
        match stake {
            StakeDecision::Stake(intent) => self.submit(intent).await,
            StakeDecision::Funded { balance } => {
                debug!(account = account.name(), %balance, "Stake not needed");
            }
            StakeDecision::Unsendable { sample, reason } => {
                warn!(account = account.name(), sample, error = %reason, "Cannot send stake of {sample} to {account}: {reason}");
                self.stats.failures += 1;
            }
        }

        let scatter = self.planner.plan_scatter(account, rng).await?;
        match scatter {
            ScatterDecision::Scatter(intent) => self.submit(intent).await,
            ScatterDecision::AwaitingFunds => {
                info!(account = account.name(), "{account} waiting for spendable coins.");
                self.stats.waiting += 1;
            }
            ScatterDecision::AwaitingSufficientFunds { balance, amount } => {
                info!(
                    account = account.name(),
                    %balance,
                    %amount,
                    "{account} waiting for sufficient spendable coins."
                );
                self.stats.waiting += 1;
            }
        }
        Ok(())
    }

    async fn submit(&mut self, intent: TransferIntent) {
        let outcome = self.executor.execute(&intent).await;
        self.stats.record(&intent, &outcome);
    }
}
