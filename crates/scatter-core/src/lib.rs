//! # scatter-core
//! Core types and contracts for Scatterbrain.
//!
//! Everything the distribution engine and the wallet client agree on lives
//! here: fixed-point amounts, the network selector, private key provisioning,
//! transfer intents and round statistics, error enums, and the
//! [`WalletBackend`](traits::WalletBackend) trait.
//!
//! # Modules
//!
//! - [`amount`]: 8-decimal fixed-point `Amount` with half-up rounding
//! - [`constants`]: protocol and naming constants
//! - [`error`]: `AmountError`, `KeyError`, `BackendError`
//! - [`keys`]: `KeyMaterial` generation, Base58Check encoding, `OsKeySource`
//! - [`network`]: `Network` selector
//! - [`traits`]: `WalletBackend`, `KeySource`
//! - [`types`]: `ScatterAccount`, `TransferIntent`, `TransferOutcome`, `RoundStats`

pub mod amount;
pub mod constants;
pub mod error;
pub mod keys;
pub mod network;
pub mod traits;
pub mod types;

pub use amount::Amount;
pub use error::{AmountError, BackendError, KeyError};
pub use keys::{KeyMaterial, OsKeySource};
pub use network::Network;
pub use traits::{KeySource, WalletBackend};
pub use types::{RoundStats, ScatterAccount, TransferIntent, TransferKind, TransferOutcome};
