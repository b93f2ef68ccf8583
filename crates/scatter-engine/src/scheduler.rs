//! Round scheduling with the stake-source minimum-balance gate.

use std::fmt;
use std::future::Future;

use rand::Rng;
use scatter_core::{Amount, KeySource, OsKeySource, RoundStats, WalletBackend};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::{ConfigError, EngineError};
use crate::policy::StakeSampler;
use crate::round::Round;

/// Where the scheduler is in its cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Gating,
    RunningRound,
    Sleeping,
    Stopped,
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Gating => "gating",
            Self::RunningRound => "running",
            Self::Sleeping => "sleeping",
            Self::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// What a single gate-plus-round produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoundReport {
    Completed(RoundStats),
    /// Stake-source balance at or below the configured minimum.
    BelowMinimum { balance: Amount },
    /// The gate balance could not be read; the round was skipped.
    GateUnavailable { reason: String },
}

impl RoundReport {
    /// Statistics for the round; all zero when it was skipped.
    pub fn stats(&self) -> RoundStats {
        match self {
            Self::Completed(stats) => stats.clone(),
            _ => RoundStats::default(),
        }
    }
}

/// Owns the configuration, backend and random sources, and runs rounds
/// until shut down.
pub struct Scheduler<B, R> {
    config: EngineConfig,
    backend: B,
    rng: R,
    keys: Box<dyn KeySource>,
    stake: StakeSampler,
    state: SchedulerState,
    rounds_completed: u64,
}

impl<B: WalletBackend, R: Rng> Scheduler<B, R> {
    /// Validate `config` and build a scheduler in the `Idle` state.
    ///
    /// New scatter accounts get keys from the OS RNG; see
    /// [`with_key_source`](Self::with_key_source).
    pub fn new(config: EngineConfig, backend: B, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let stake = config.stake_sampler()?;
        Ok(Self {
            config,
            backend,
            rng,
            keys: Box::new(OsKeySource),
            stake,
            state: SchedulerState::Idle,
            rounds_completed: 0,
        })
    }

    /// Replace the source of private keys for new scatter accounts.
    pub fn with_key_source(mut self, keys: impl KeySource + 'static) -> Self {
        self.keys = Box::new(keys);
        self
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Rounds that passed the gate and ran to completion.
    pub fn rounds_completed(&self) -> u64 {
        self.rounds_completed
    }

    /// Run the gate and, if it passes, one round over the whole pool.
    ///
    /// Only a fatal engine error is returned as `Err`; everything else is
    /// reported through [`RoundReport`].
    pub async fn run_once(&mut self) -> Result<RoundReport, EngineError> {
        self.state = SchedulerState::Gating;
        let config = &self.config;

        let balance = match self
            .backend
            .get_balance(&config.stake_account, config.confirmations)
            .await
        {
            Ok(balance) => balance,
            Err(e) => {
                warn!(account = %config.stake_account, error = %e, "Could not read stake account balance, skipping round: {e}");
                self.state = SchedulerState::Idle;
                return Ok(RoundReport::GateUnavailable {
                    reason: e.to_string(),
                });
            }
        };
        info!(account = %config.stake_account, %balance, "Current stake account balance: {balance}");

        if balance <= config.min_balance {
            info!(
                %balance,
                minimum = %config.min_balance,
                "Stake account spendable balance at or below minimum. No scattering this cycle."
            );
            self.state = SchedulerState::Idle;
            return Ok(RoundReport::BelowMinimum { balance });
        }

        self.state = SchedulerState::RunningRound;
        let result = Round::new(&self.config, &self.backend, self.keys.as_ref(), self.stake)
            .run(&mut self.rng)
            .await;
        self.state = SchedulerState::Idle;
        let stats = result?;

        self.rounds_completed += 1;
        info!(
            round = self.rounds_completed,
            stakes = stats.stakes,
            scatters = stats.scatters,
            failures = stats.failures,
            waiting = stats.waiting,
            skipped = stats.skipped,
            "Scatter round complete."
        );
        info!(
            "Staked {} to {} accounts.",
            stats.stake_amount, stats.stakes
        );
        info!(
            "Scattered {} to {} accounts.",
            stats.scatter_amount, stats.scatters
        );
        Ok(RoundReport::Completed(stats))
    }

    /// Run rounds back to back, sleeping `interval` between them, until
    /// `shutdown` resolves or a fatal error occurs.
    ///
    /// Shutdown is honoured both while sleeping and in the middle of a
    /// round; an interrupted round is abandoned and ends in `Stopped`.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<(), EngineError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let report = tokio::select! {
                biased;
                _ = &mut shutdown => None,
                report = self.run_once() => Some(report),
            };
            let Some(report) = report else {
                break;
            };
            if let Err(e) = report {
                self.state = SchedulerState::Stopped;
                return Err(e);
            }

            self.state = SchedulerState::Sleeping;
            let interval = self.config.interval;
            debug!(?interval, "Sleeping until next round");
            let stop = tokio::select! {
                biased;
                _ = &mut shutdown => true,
                _ = tokio::time::sleep(interval) => false,
            };
            if stop {
                break;
            }
        }

        self.state = SchedulerState::Stopped;
        info!(rounds = self.rounds_completed, "Shutting down scatterbrain.");
        Ok(())
    }
}
