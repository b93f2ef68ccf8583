//! Engine configuration.
//!
//! Provides [`EngineConfig`] with the daemon's defaults. The binary layers a
//! config file and command-line flags on top, then the scheduler validates
//! the result once and never mutates it.

use std::fmt;
use std::time::Duration;

use scatter_core::constants::{COIN, DEFAULT_CONFIRMATIONS, DEFAULT_RPC_PORT};
use scatter_core::{Amount, Network, ScatterAccount};

use crate::error::ConfigError;
use crate::policy::{ScatterPolicy, StakeSampler};

/// Immutable settings for one scheduler instance.
#[derive(Clone)]
pub struct EngineConfig {
    /// Wallet RPC host.
    pub host: String,
    /// Wallet RPC port. Also selects the network.
    pub port: u16,
    /// Wallet RPC user.
    pub user: String,
    /// Wallet RPC password.
    pub password: String,
    /// Account that funds stakes and is checked against `min_balance`.
    pub stake_account: String,
    /// Number of scatter accounts, N.
    pub scatter_count: u32,
    /// Scatter account name prefix.
    pub prefix: String,
    /// Pause between rounds.
    pub interval: Duration,
    /// Mean stake top-up.
    pub stake_mean: f64,
    /// Standard deviation of the stake top-up.
    pub stake_sd: f64,
    /// Accounts whose unconfirmed balance is below this get a stake.
    pub stake_threshold: Amount,
    /// Lower scatter bound.
    pub transfer_min: f64,
    /// Upper scatter bound.
    pub transfer_max: f64,
    pub scatter_policy: ScatterPolicy,
    /// Rounds only run while the stake account holds more than this.
    pub min_balance: Amount,
    /// Confirmations required for spendable balances and sends.
    pub confirmations: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_RPC_PORT,
            user: "user".to_string(),
            password: "password".to_string(),
            stake_account: String::new(),
            scatter_count: 10,
            prefix: "scatterbrain".to_string(),
            interval: Duration::from_secs(120),
            stake_mean: 50.0,
            stake_sd: 5.0,
            stake_threshold: Amount::from_units(10 * COIN),
            transfer_min: 0.01,
            transfer_max: 0.25,
            scatter_policy: ScatterPolicy::Legacy,
            // Stay above the masternode collateral by default.
            min_balance: Amount::from_units(315_000 * COIN),
            confirmations: DEFAULT_CONFIRMATIONS,
        }
    }
}

impl EngineConfig {
    /// Network derived from the RPC port.
    pub fn network(&self) -> Network {
        Network::from_port(self.port)
    }

    /// Base URL of the wallet JSON-RPC endpoint (credentials excluded).
    pub fn rpc_url(&self) -> String {
        format!("http://{}:{}/", self.host, self.port)
    }

    /// The scatter pool in ascending sequence order.
    pub fn accounts(&self) -> impl Iterator<Item = ScatterAccount> + '_ {
        (1..=self.scatter_count).map(|i| ScatterAccount::new(&self.prefix, i))
    }

    /// The account with the given 1-based sequence number.
    pub fn account(&self, sequence: u32) -> ScatterAccount {
        ScatterAccount::new(&self.prefix, sequence)
    }

    /// Stake sampler for the configured distribution.
    pub fn stake_sampler(&self) -> Result<StakeSampler, ConfigError> {
        StakeSampler::new(self.stake_mean, self.stake_sd)
    }

    /// Check every startup invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stake_account.trim().is_empty() {
            return Err(ConfigError::MissingAccount);
        }
        if self.scatter_count < 2 {
            return Err(ConfigError::PoolTooSmall(self.scatter_count));
        }
        if self.prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix);
        }
        let bad_host = |c: char| c.is_whitespace() || matches!(c, '/' | '@' | '?' | '#');
        if self.host.is_empty() || self.host.contains(bad_host) {
            return Err(ConfigError::InvalidHost(self.host.clone()));
        }
        if self.interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        self.stake_sampler()?;

        let (min, max) = (self.transfer_min, self.transfer_max);
        if !min.is_finite() || !max.is_finite() || min < 0.0 || max < min {
            return Err(ConfigError::InvalidScatterBounds { min, max });
        }
        Ok(())
    }
}

impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("stake_account", &self.stake_account)
            .field("scatter_count", &self.scatter_count)
            .field("prefix", &self.prefix)
            .field("interval", &self.interval)
            .field("stake_mean", &self.stake_mean)
            .field("stake_sd", &self.stake_sd)
            .field("stake_threshold", &self.stake_threshold)
            .field("transfer_min", &self.transfer_min)
            .field("transfer_max", &self.transfer_max)
            .field("scatter_policy", &self.scatter_policy)
            .field("min_balance", &self.min_balance)
            .field("confirmations", &self.confirmations)
            .finish()
    }
}
