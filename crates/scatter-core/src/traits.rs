//! Trait interface between the engine and the wallet daemon.
//!
//! - [`WalletBackend`]: account-based wallet operations (the JSON-RPC client
//!   in the `scatterbrain` binary implements it; the engine's `testing`
//!   feature provides an in-memory one)
//! - [`KeySource`]: private keys for newly created scatter accounts

use async_trait::async_trait;

use crate::amount::Amount;
use crate::error::{BackendError, KeyError};
use crate::keys::KeyMaterial;
use crate::network::Network;

/// Account-based wallet operations used by the distribution engine.
///
/// Transaction construction and signing happen inside the backend. Every
/// call may fail with a [`BackendError`]; the engine decides which failures
/// are per-transfer and which skip an account.
#[async_trait]
pub trait WalletBackend: Send + Sync {
    /// Balance of `account` counting only funds with at least
    /// `confirmations` confirmations. Unknown accounts report zero.
    async fn get_balance(&self, account: &str, confirmations: u32) -> Result<Amount, BackendError>;

    /// Receive addresses for `account`, oldest first. Empty if the account
    /// is unknown.
    async fn get_addresses_by_account(&self, account: &str) -> Result<Vec<String>, BackendError>;

    /// Import an encoded private key under `account`.
    async fn import_priv_key(&self, key: &str, account: &str, rescan: bool) -> Result<(), BackendError>;

    /// Send `amount` from `source` to `destination`, spending only funds
    /// with at least `confirmations` confirmations. Returns the txid.
    async fn send_from(
        &self,
        source: &str,
        destination: &str,
        amount: Amount,
        confirmations: u32,
    ) -> Result<String, BackendError>;
}

/// Produces the private key imported for each new scatter account.
///
/// A failure here is fatal: the engine cannot create accounts without
/// entropy, so it stops instead of skipping.
pub trait KeySource: Send + Sync {
    fn generate(&self, network: Network) -> Result<KeyMaterial, KeyError>;
}
