//! Account resolution with lazy creation.

use scatter_core::{KeySource, Network, WalletBackend};
use tracing::info;

use crate::error::EngineError;

/// Resolves scatter account names to their first receive address,
/// importing a fresh key for accounts the backend has never seen.
pub struct AccountDirectory<'a, B: ?Sized> {
    backend: &'a B,
    network: Network,
    keys: &'a dyn KeySource,
}

impl<'a, B: WalletBackend + ?Sized> AccountDirectory<'a, B> {
    pub fn new(backend: &'a B, network: Network, keys: &'a dyn KeySource) -> Self {
        Self {
            backend,
            network,
            keys,
        }
    }

    /// Return the first address of `name`, creating the account if needed.
    ///
    /// Idempotent: once an account has an address, later calls only query.
    /// Keys are imported without a rescan since a freshly generated key
    /// cannot have history.
    pub async fn ensure_account(&self, name: &str) -> Result<String, EngineError> {
        if let Some(address) = self.first_address(name).await? {
            return Ok(address);
        }

        let key = self.keys.generate(self.network)?;
        self.backend.import_priv_key(key.as_str(), name, false).await?;
        drop(key);

        let address = self
            .first_address(name)
            .await?
            .ok_or_else(|| EngineError::NoAddress(name.to_string()))?;
        info!(account = name, %address, "Created new scatter account {name}");
        Ok(address)
    }

    async fn first_address(&self, name: &str) -> Result<Option<String>, EngineError> {
        let addresses = self.backend.get_addresses_by_account(name).await?;
        Ok(addresses.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{BackendCall, FailingKeySource, MemoryBackend};
    use scatter_core::{BackendError, KeyError, OsKeySource};

    #[tokio::test]
    async fn creates_missing_account_once() {
        let backend = MemoryBackend::new();
        let directory = AccountDirectory::new(&backend, Network::Mainnet, &OsKeySource);

        let first = directory.ensure_account("sb-0001").await.unwrap();
        let second = directory.ensure_account("sb-0001").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(backend.imports().len(), 1);
        assert_eq!(backend.imports()[0].account, "sb-0001");
        assert!(!backend.imports()[0].rescan);
    }

    #[tokio::test]
    async fn existing_account_is_not_reimported() {
        let backend = MemoryBackend::new();
        backend.add_address("sb-0002", "existing-address");
        let directory = AccountDirectory::new(&backend, Network::Mainnet, &OsKeySource);

        let address = directory.ensure_account("sb-0002").await.unwrap();

        assert_eq!(address, "existing-address");
        assert!(backend.imports().is_empty());
        assert_eq!(
            backend.calls(),
            vec![BackendCall::GetAddresses {
                account: "sb-0002".into()
            }]
        );
    }

    #[tokio::test]
    async fn imported_key_uses_network_version() {
        let backend = MemoryBackend::new();
        let directory = AccountDirectory::new(&backend, Network::Testnet, &OsKeySource);
        directory.ensure_account("sb-0001").await.unwrap();

        let key = &backend.imports()[0].key;
        let raw = bs58::decode(key).into_vec().unwrap();
        assert_eq!(raw[0], Network::Testnet.secret_key_version());
    }

    #[tokio::test]
    async fn lookup_failure_propagates() {
        let backend = MemoryBackend::new();
        backend.fail_reads_for("sb-0001");
        let directory = AccountDirectory::new(&backend, Network::Mainnet, &OsKeySource);

        let err = directory.ensure_account("sb-0001").await.unwrap_err();
        assert!(matches!(err, EngineError::Backend(BackendError::Transport(_))));
        assert!(backend.imports().is_empty());
    }

    #[tokio::test]
    async fn import_without_address_is_an_error() {
        let backend = MemoryBackend::new();
        backend.ignore_imports();
        let directory = AccountDirectory::new(&backend, Network::Mainnet, &OsKeySource);

        let err = directory.ensure_account("sb-0001").await.unwrap_err();
        assert_eq!(err, EngineError::NoAddress("sb-0001".into()));
    }

    #[tokio::test]
    async fn key_failure_stops_before_import() {
        let backend = MemoryBackend::new();
        let directory = AccountDirectory::new(&backend, Network::Mainnet, &FailingKeySource);

        let err = directory.ensure_account("sb-0001").await.unwrap_err();
        assert!(matches!(err, EngineError::Key(KeyError::Entropy(_))));
        assert!(err.is_fatal());
        assert!(backend.imports().is_empty());
    }
}
