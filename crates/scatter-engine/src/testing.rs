//! In-memory wallet backend for tests.
//!
//! [`MemoryBackend`] keeps per-account confirmed and pending balances and a
//! log of every call, so tests can assert on both outcomes and the exact
//! sequence of wallet operations. [`FailingKeySource`] stands in for an
//! entropy source that has gone away. Enabled by the `testing` feature.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;
use scatter_core::{Amount, BackendError, KeyError, KeyMaterial, KeySource, Network, WalletBackend};

/// RPC code the reference wallet returns for an underfunded `sendfrom`.
const RPC_WALLET_INSUFFICIENT_FUNDS: i64 = -6;

/// One recorded backend call, in arrival order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendCall {
    GetBalance {
        account: String,
        confirmations: u32,
    },
    GetAddresses {
        account: String,
    },
    ImportPrivKey {
        account: String,
        rescan: bool,
    },
    SendFrom {
        source: String,
        destination: String,
        amount: Amount,
        confirmations: u32,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportRecord {
    pub key: String,
    pub account: String,
    pub rescan: bool,
}

/// A send the backend accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SendRecord {
    pub source: String,
    pub destination: String,
    pub amount: Amount,
    pub confirmations: u32,
    pub txid: String,
}

#[derive(Default)]
struct Entry {
    addresses: Vec<String>,
    confirmed: Amount,
    pending: Amount,
}

#[derive(Default)]
struct State {
    accounts: BTreeMap<String, Entry>,
    calls: Vec<BackendCall>,
    imports: Vec<ImportRecord>,
    sends: Vec<SendRecord>,
    failing_reads: HashSet<String>,
    failing_sends: HashSet<String>,
    ignore_imports: bool,
    next_address: u64,
    next_txid: u64,
}

impl State {
    fn owner_of(&self, address: &str) -> Option<String> {
        self.accounts
            .iter()
            .find(|(_, entry)| entry.addresses.iter().any(|a| a == address))
            .map(|(name, _)| name.clone())
    }
}

/// Deterministic wallet double.
///
/// Funds sent to an address owned by another account land in that
/// account's pending balance and only become spendable after
/// [`MemoryBackend::confirm_all`].
#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add confirmed funds to `account`.
    pub fn fund(&self, account: &str, amount: Amount) {
        let mut state = self.state.lock();
        let entry = state.accounts.entry(account.to_string()).or_default();
        entry.confirmed = entry.confirmed.saturating_add(amount);
    }

    /// Add unconfirmed funds to `account`.
    pub fn credit_pending(&self, account: &str, amount: Amount) {
        let mut state = self.state.lock();
        let entry = state.accounts.entry(account.to_string()).or_default();
        entry.pending = entry.pending.saturating_add(amount);
    }

    pub fn add_address(&self, account: &str, address: &str) {
        let mut state = self.state.lock();
        state
            .accounts
            .entry(account.to_string())
            .or_default()
            .addresses
            .push(address.to_string());
    }

    /// Make every balance and address lookup for `account` fail.
    pub fn fail_reads_for(&self, account: &str) {
        self.state.lock().failing_reads.insert(account.to_string());
    }

    /// Make every send out of `account` fail at the transport level.
    pub fn fail_sends_from(&self, account: &str) {
        self.state.lock().failing_sends.insert(account.to_string());
    }

    /// Accept imports without creating an address.
    pub fn ignore_imports(&self) {
        self.state.lock().ignore_imports = true;
    }

    /// Mine a block: every pending balance becomes confirmed.
    pub fn confirm_all(&self) {
        let mut state = self.state.lock();
        for entry in state.accounts.values_mut() {
            entry.confirmed = entry.confirmed.saturating_add(entry.pending);
            entry.pending = Amount::ZERO;
        }
    }

    pub fn confirmed_balance(&self, account: &str) -> Amount {
        self.state
            .lock()
            .accounts
            .get(account)
            .map_or(Amount::ZERO, |e| e.confirmed)
    }

    pub fn pending_balance(&self, account: &str) -> Amount {
        self.state
            .lock()
            .accounts
            .get(account)
            .map_or(Amount::ZERO, |e| e.pending)
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.state.lock().calls.clone()
    }

    pub fn imports(&self) -> Vec<ImportRecord> {
        self.state.lock().imports.clone()
    }

    /// Accepted sends only.
    pub fn sends(&self) -> Vec<SendRecord> {
        self.state.lock().sends.clone()
    }

    /// Number of import and send attempts, successful or not.
    pub fn mutation_count(&self) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| matches!(c, BackendCall::ImportPrivKey { .. } | BackendCall::SendFrom { .. }))
            .count()
    }
}

/// Key source whose every draw fails with [`KeyError::Entropy`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FailingKeySource;

impl KeySource for FailingKeySource {
    fn generate(&self, _network: Network) -> Result<KeyMaterial, KeyError> {
        Err(KeyError::Entropy("entropy source unavailable".into()))
    }
}

fn unreachable_wallet(account: &str) -> BackendError {
    BackendError::Transport(format!("wallet unreachable while reading {account}"))
}

#[async_trait]
impl WalletBackend for MemoryBackend {
    async fn get_balance(&self, account: &str, confirmations: u32) -> Result<Amount, BackendError> {
        let mut state = self.state.lock();
        state.calls.push(BackendCall::GetBalance {
            account: account.to_string(),
            confirmations,
        });
        if state.failing_reads.contains(account) {
            return Err(unreachable_wallet(account));
        }
        let balance = state.accounts.get(account).map_or(Amount::ZERO, |e| {
            if confirmations == 0 {
                e.confirmed.saturating_add(e.pending)
            } else {
                e.confirmed
            }
        });
        Ok(balance)
    }

    async fn get_addresses_by_account(&self, account: &str) -> Result<Vec<String>, BackendError> {
        let mut state = self.state.lock();
        state.calls.push(BackendCall::GetAddresses {
            account: account.to_string(),
        });
        if state.failing_reads.contains(account) {
            return Err(unreachable_wallet(account));
        }
        Ok(state
            .accounts
            .get(account)
            .map(|e| e.addresses.clone())
            .unwrap_or_default())
    }

    async fn import_priv_key(&self, key: &str, account: &str, rescan: bool) -> Result<(), BackendError> {
        let mut state = self.state.lock();
        state.calls.push(BackendCall::ImportPrivKey {
            account: account.to_string(),
            rescan,
        });
        state.imports.push(ImportRecord {
            key: key.to_string(),
            account: account.to_string(),
            rescan,
        });
        if state.ignore_imports {
            return Ok(());
        }
        state.next_address += 1;
        let address = format!("addr-{}", state.next_address);
        state
            .accounts
            .entry(account.to_string())
            .or_default()
            .addresses
            .push(address);
        Ok(())
    }

    async fn send_from(
        &self,
        source: &str,
        destination: &str,
        amount: Amount,
        confirmations: u32,
    ) -> Result<String, BackendError> {
        let mut state = self.state.lock();
        state.calls.push(BackendCall::SendFrom {
            source: source.to_string(),
            destination: destination.to_string(),
            amount,
            confirmations,
        });
        if state.failing_sends.contains(source) {
            return Err(BackendError::Transport("connection reset by peer".to_string()));
        }

        let available = state.accounts.get(source).map_or(Amount::ZERO, |e| {
            if confirmations == 0 {
                e.confirmed.saturating_add(e.pending)
            } else {
                e.confirmed
            }
        });
        if available < amount {
            return Err(BackendError::Rpc {
                code: RPC_WALLET_INSUFFICIENT_FUNDS,
                message: "Account has insufficient funds".to_string(),
            });
        }

        if let Some(entry) = state.accounts.get_mut(source) {
            // Spend confirmed coins first.
            let from_confirmed = amount.min(entry.confirmed);
            entry.confirmed = entry.confirmed.checked_sub(from_confirmed).unwrap_or(Amount::ZERO);
            let rest = amount.checked_sub(from_confirmed).unwrap_or(Amount::ZERO);
            entry.pending = entry.pending.checked_sub(rest).unwrap_or(Amount::ZERO);
        }
        if let Some(owner) = state.owner_of(destination) {
            let entry = state.accounts.entry(owner).or_default();
            entry.pending = entry.pending.saturating_add(amount);
        }

        state.next_txid += 1;
        let txid = format!("{:064x}", state.next_txid);
        state.sends.push(SendRecord {
            source: source.to_string(),
            destination: destination.to_string(),
            amount,
            confirmations,
            txid: txid.clone(),
        });
        Ok(txid)
    }
}
