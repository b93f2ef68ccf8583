//! Command-line and config-file settings.
//!
//! Every field is optional so the two sources can be layered: a value given
//! on the command line wins over the config file, and anything left unset
//! falls back to the [`EngineConfig`] default.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, File, FileFormat};
use scatter_core::Amount;
use scatter_engine::{ConfigError, EngineConfig, ScatterPolicy};
use serde::Deserialize;

/// Default HTTP timeout for wallet RPC calls.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(30);

/// Daemon settings as they appear on the command line and in the config file.
#[derive(clap::Args, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Wallet RPC host [default: localhost]
    #[arg(short = 'h', long)]
    pub host: Option<String>,

    /// Wallet RPC port; ports starting with "10" select mainnet [default: 10617]
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Wallet RPC user [default: user]
    #[arg(short = 'u', long)]
    pub user: Option<String>,

    /// Wallet RPC password [default: password]
    #[arg(short = 'p', long)]
    pub password: Option<String>,

    /// Stake-source account (required)
    #[arg(short = 'a', long)]
    pub account: Option<String>,

    /// Number of scatter accounts [default: 10]
    #[arg(short = 'S', long)]
    pub scatter: Option<u32>,

    /// Scatter account name prefix [default: scatterbrain]
    #[arg(short = 'x', long)]
    pub prefix: Option<String>,

    /// Seconds between rounds [default: 120]
    #[arg(short = 'i', long)]
    pub interval: Option<u64>,

    /// Mean stake top-up [default: 50.0]
    #[arg(short = 's', long, alias = "stakeMean")]
    #[serde(rename = "stakeMean", alias = "stakemean")]
    pub stake_mean: Option<f64>,

    /// Standard deviation of the stake top-up [default: 5.0]
    #[arg(short = 'd', long, alias = "stakeSD")]
    #[serde(rename = "stakeSD", alias = "stakesd")]
    pub stake_sd: Option<f64>,

    /// Accounts below this balance receive a stake [default: 10.0]
    #[arg(short = 'n', long, alias = "stakeThreshhold")]
    #[serde(
        rename = "stakeThreshhold",
        alias = "stakethreshhold",
        alias = "stakeThreshold",
        alias = "stakethreshold"
    )]
    pub stake_threshold: Option<f64>,

    /// Smallest scatter amount [default: 0.01]
    #[arg(short = 't', long, alias = "transferMin")]
    #[serde(rename = "transferMin", alias = "transfermin")]
    pub transfer_min: Option<f64>,

    /// Largest scatter amount [default: 0.25]
    #[arg(short = 'T', long, alias = "transferMax")]
    #[serde(rename = "transferMax", alias = "transfermax")]
    pub transfer_max: Option<f64>,

    /// Rounds only run while the stake account holds more than this [default: 315000.0]
    #[arg(short = 'm', long)]
    pub minimum: Option<f64>,

    /// Scatter amount policy [default: legacy]
    #[arg(long, value_parser = ["legacy", "uniform"])]
    #[serde(rename = "scatterPolicy", alias = "scatterpolicy")]
    pub scatter_policy: Option<String>,

    /// Confirmations required before funds are spendable [default: 6]
    #[arg(long)]
    pub confirmations: Option<u32>,

    /// Wallet RPC timeout in seconds [default: 30]
    #[arg(long)]
    #[serde(rename = "rpcTimeout", alias = "rpctimeout")]
    pub rpc_timeout: Option<u64>,
}

impl Settings {
    /// Read an INI-style `key=value` file. A missing file is an error.
    pub fn from_file(path: &Path) -> Result<Self> {
        Config::builder()
            .add_source(File::from(path).format(FileFormat::Ini).required(true))
            .build()
            .and_then(|c| c.try_deserialize())
            .with_context(|| format!("failed to load config file {}", path.display()))
    }

    /// Fill every unset field from `fallback`.
    pub fn or(self, fallback: Settings) -> Settings {
        Settings {
            host: self.host.or(fallback.host),
            port: self.port.or(fallback.port),
            user: self.user.or(fallback.user),
            password: self.password.or(fallback.password),
            account: self.account.or(fallback.account),
            scatter: self.scatter.or(fallback.scatter),
            prefix: self.prefix.or(fallback.prefix),
            interval: self.interval.or(fallback.interval),
            stake_mean: self.stake_mean.or(fallback.stake_mean),
            stake_sd: self.stake_sd.or(fallback.stake_sd),
            stake_threshold: self.stake_threshold.or(fallback.stake_threshold),
            transfer_min: self.transfer_min.or(fallback.transfer_min),
            transfer_max: self.transfer_max.or(fallback.transfer_max),
            minimum: self.minimum.or(fallback.minimum),
            scatter_policy: self.scatter_policy.or(fallback.scatter_policy),
            confirmations: self.confirmations.or(fallback.confirmations),
            rpc_timeout: self.rpc_timeout.or(fallback.rpc_timeout),
        }
    }

    pub fn rpc_timeout(&self) -> Duration {
        self.rpc_timeout
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_RPC_TIMEOUT)
    }

    /// Build the engine configuration, using defaults for unset fields.
    ///
    /// Conversion errors are reported here; the remaining invariants are
    /// checked by [`EngineConfig::validate`].
    pub fn into_engine_config(self) -> Result<EngineConfig, ConfigError> {
        let d = EngineConfig::default();
        let scatter_policy = self
            .scatter_policy
            .as_deref()
            .map(str::parse::<ScatterPolicy>)
            .transpose()?
            .unwrap_or(d.scatter_policy);

        Ok(EngineConfig {
            host: self.host.unwrap_or(d.host),
            port: self.port.unwrap_or(d.port),
            user: self.user.unwrap_or(d.user),
            password: self.password.unwrap_or(d.password),
            stake_account: self.account.unwrap_or(d.stake_account),
            scatter_count: self.scatter.unwrap_or(d.scatter_count),
            prefix: self.prefix.unwrap_or(d.prefix),
            interval: self.interval.map(Duration::from_secs).unwrap_or(d.interval),
            stake_mean: self.stake_mean.unwrap_or(d.stake_mean),
            stake_sd: self.stake_sd.unwrap_or(d.stake_sd),
            stake_threshold: coins("stake threshold", self.stake_threshold)?
                .unwrap_or(d.stake_threshold),
            transfer_min: self.transfer_min.unwrap_or(d.transfer_min),
            transfer_max: self.transfer_max.unwrap_or(d.transfer_max),
            scatter_policy,
            min_balance: coins("minimum balance", self.minimum)?.unwrap_or(d.min_balance),
            confirmations: self.confirmations.unwrap_or(d.confirmations),
        })
    }
}

fn coins(field: &'static str, value: Option<f64>) -> Result<Option<Amount>, ConfigError> {
    value
        .map(|v| Amount::from_coins_f64(v).map_err(|source| ConfigError::InvalidAmount { field, source }))
        .transpose()
}
