//! Stake and scatter decisions for a single account.
//!
//! The planner reads live balances and decides; it never sends. The round
//! driver interleaves the two steps with execution so the scatter check for
//! an account sees the balance after that account's stake decision.

use rand::Rng;
use scatter_core::error::AmountError;
use scatter_core::{Amount, KeySource, ScatterAccount, TransferIntent, TransferKind, WalletBackend};

use crate::config::EngineConfig;
use crate::directory::AccountDirectory;
use crate::error::EngineError;
use crate::policy::{pick_target, StakeSampler};

/// Result of the staking-threshold check.
#[derive(Clone, Debug, PartialEq)]
pub enum StakeDecision {
    /// Balance is below the threshold; top it up.
    Stake(TransferIntent),
    /// Balance (unconfirmed included) already meets the threshold.
    Funded { balance: Amount },
    /// The sampled stake rounds to something that cannot be sent.
    Unsendable { sample: f64, reason: AmountError },
}

/// Result of the scatter eligibility check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScatterDecision {
    Scatter(TransferIntent),
    /// No confirmed funds at all.
    AwaitingFunds,
    /// Confirmed funds exist but do not exceed the drawn amount.
    AwaitingSufficientFunds { balance: Amount, amount: Amount },
}

/// Applies the staking and scatter policies to one account at a time.
pub struct RoundPlanner<'a, B: ?Sized> {
    config: &'a EngineConfig,
    backend: &'a B,
    directory: AccountDirectory<'a, B>,
    stake: StakeSampler,
}

impl<'a, B: WalletBackend + ?Sized> RoundPlanner<'a, B> {
    pub fn new(
        config: &'a EngineConfig,
        backend: &'a B,
        keys: &'a dyn KeySource,
        stake: StakeSampler,
    ) -> Self {
        Self {
            config,
            backend,
            directory: AccountDirectory::new(backend, config.network(), keys),
            stake,
        }
    }

    /// Source accounts in the order they are processed, 1..=N.
    pub fn accounts(&self) -> impl Iterator<Item = ScatterAccount> + 'a {
        let config: &'a EngineConfig = self.config;
        config.accounts()
    }

    /// Address of `account`, creating it on first use.
    pub async fn resolve(&self, account: &ScatterAccount) -> Result<String, EngineError> {
        self.directory.ensure_account(account.name()).await
    }

    /// Decide whether `account` needs a stake top-up.
    ///
    /// Uses the zero-confirmation balance, so a stake sent in an earlier
    /// round but not yet confirmed still counts and is not sent twice.
    pub async fn plan_stake<R: Rng + ?Sized>(
        &self,
        account: &ScatterAccount,
        address: &str,
        rng: &mut R,
    ) -> Result<StakeDecision, EngineError> {
        let balance = self.backend.get_balance(account.name(), 0).await?;
        if balance >= self.config.stake_threshold {
            return Ok(StakeDecision::Funded { balance });
        }

        let sample = self.stake.sample(rng);
        let amount = match Amount::from_coins_f64(sample) {
            Ok(amount) => amount,
            Err(reason) => return Ok(StakeDecision::Unsendable { sample, reason }),
        };
        Ok(StakeDecision::Stake(TransferIntent {
            kind: TransferKind::Stake,
            source: self.config.stake_account.clone(),
            destination: address.to_string(),
            recipient: account.name().to_string(),
            amount,
            confirmations: self.config.confirmations,
        }))
    }

    /// Decide whether `account` scatters this round, and to whom.
    ///
    /// Only confirmed funds count, so a stake issued earlier in the same
    /// round is not spendable yet.
    pub async fn plan_scatter<R: Rng + ?Sized>(
        &self,
        account: &ScatterAccount,
        rng: &mut R,
    ) -> Result<ScatterDecision, EngineError> {
        let config = self.config;
        let spendable = self
            .backend
            .get_balance(account.name(), config.confirmations)
            .await?;
        if spendable.is_zero() {
            return Ok(ScatterDecision::AwaitingFunds);
        }

        let target = pick_target(rng, account.sequence(), config.scatter_count)
            .map(|seq| config.account(seq))
            .ok_or(EngineError::NoTarget(config.scatter_count, account.sequence()))?;
        let destination = self.directory.ensure_account(target.name()).await?;

        let sample = config
            .scatter_policy
            .sample(rng, config.transfer_min, config.transfer_max);
        let amount = Amount::from_coins_f64(sample)?;
        if amount >= spendable {
            return Ok(ScatterDecision::AwaitingSufficientFunds {
                balance: spendable,
                amount,
            });
        }

        Ok(ScatterDecision::Scatter(TransferIntent {
            kind: TransferKind::Scatter,
            source: account.name().to_string(),
            destination,
            recipient: target.name().to_string(),
            amount,
            confirmations: config.confirmations,
        }))
    }
}
