//! Engine error types.

use scatter_core::error::{AmountError, BackendError, KeyError};
use thiserror::Error;

/// Startup configuration problems. The scheduler never starts with one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// No stake-source account was given.
    #[error("no stake account specified")]
    MissingAccount,

    /// Scattering needs at least two accounts to pick a target from.
    #[error("scatter pool needs at least 2 accounts, got {0}")]
    PoolTooSmall(u32),

    /// Scatter account prefix is empty.
    #[error("scatter account prefix must not be empty")]
    EmptyPrefix,

    /// RPC host is empty or contains characters that cannot appear in a URL host.
    #[error("invalid RPC host: {0:?}")]
    InvalidHost(String),

    /// Round interval of zero would spin the backend.
    #[error("round interval must be greater than zero")]
    ZeroInterval,

    /// Stake mean or standard deviation unusable for a normal distribution.
    #[error("invalid stake distribution: mean {mean}, standard deviation {sd}")]
    InvalidStakeDistribution { mean: f64, sd: f64 },

    /// Scatter bounds are negative, non-finite, or inverted.
    #[error("invalid scatter bounds: min {min}, max {max}")]
    InvalidScatterBounds { min: f64, max: f64 },

    /// A threshold or balance could not be represented as an amount.
    #[error("invalid {field}: {source}")]
    InvalidAmount {
        field: &'static str,
        source: AmountError,
    },

    /// Unrecognised scatter policy name.
    #[error("unknown scatter policy: {0:?} (expected \"legacy\" or \"uniform\")")]
    UnknownPolicy(String),
}

/// Errors that stop processing of one account, or the whole scheduler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Amount(#[from] AmountError),

    /// The backend reported no address for an account right after importing its key.
    #[error("no address for account {0} after key import")]
    NoAddress(String),

    /// No scatter target exists for a pool of this size.
    #[error("scatter pool of {0} has no target for account {1}")]
    NoTarget(u32, u32),
}

impl EngineError {
    /// Whether the scheduler must stop. Entropy failures and a pool with no
    /// scatter target qualify; every other error skips the current account.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::Key(_) | EngineError::NoTarget(..))
    }
}
