//! # scatter-engine
//! Round-based distribution engine.
//!
//! Each round walks the scatter pool in order. Accounts below the stake
//! threshold are topped up from the stake-source account; accounts with
//! confirmed funds send a small random amount to another random account in
//! the pool. Transfer failures are isolated per intent and never end a round.
//!
//! # Modules
//!
//! - [`config`]: validated `EngineConfig`
//! - [`error`]: `ConfigError`, `EngineError`
//! - [`policy`]: stake sampler, scatter amount policies, target selection
//! - [`directory`]: `AccountDirectory` (resolve or create accounts)
//! - [`planner`]: `RoundPlanner` (stake and scatter decisions)
//! - [`executor`]: `TransferExecutor` (send with failure isolation)
//! - [`round`]: `Round` driver for one pass over the pool
//! - [`scheduler`]: `Scheduler` loop with the minimum-balance gate

pub mod config;
pub mod directory;
pub mod error;
pub mod executor;
pub mod planner;
pub mod policy;
pub mod round;
pub mod scheduler;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::EngineConfig;
pub use directory::AccountDirectory;
pub use error::{ConfigError, EngineError};
pub use executor::TransferExecutor;
pub use planner::{RoundPlanner, ScatterDecision, StakeDecision};
pub use policy::{ScatterPolicy, StakeSampler};
pub use round::Round;
pub use scheduler::{RoundReport, Scheduler, SchedulerState};
