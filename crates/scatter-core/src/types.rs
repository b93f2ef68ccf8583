//! Domain types for one distribution round.

use std::fmt;

use crate::amount::Amount;
use crate::constants::ACCOUNT_SEQUENCE_WIDTH;

/// A logical scatter sub-account, named `prefix-NNNN`.
///
/// The backend is authoritative for its addresses and balance; neither is
/// cached here.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScatterAccount {
    sequence: u32,
    name: String,
}

impl ScatterAccount {
    pub fn new(prefix: &str, sequence: u32) -> Self {
        Self {
            sequence,
            name: format!("{prefix}-{sequence:0width$}", width = ACCOUNT_SEQUENCE_WIDTH),
        }
    }

    /// Position in the pool, 1-based.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Backend account name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ScatterAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransferKind {
    /// Stake-source account topping up a scatter account.
    Stake,
    /// One scatter account paying another.
    Scatter,
}

impl fmt::Display for TransferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferKind::Stake => f.write_str("stake"),
            TransferKind::Scatter => f.write_str("scatter"),
        }
    }
}

/// A single transfer decided by the planner. Consumed once by the executor;
/// a failed intent is dropped, never retried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferIntent {
    pub kind: TransferKind,
    /// Backend account the funds leave from.
    pub source: String,
    /// Receive address of the destination account.
    pub destination: String,
    /// Destination account name, for status lines.
    pub recipient: String,
    pub amount: Amount,
    /// Minimum confirmations of the funds being spent.
    pub confirmations: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransferOutcome {
    Success { txid: String, amount: Amount },
    Failure { reason: String },
}

impl TransferOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TransferOutcome::Success { .. })
    }
}

/// Per-round accumulator, reported and discarded when the round ends.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoundStats {
    /// Successful stake transfers.
    pub stakes: u32,
    pub stake_amount: Amount,
    /// Successful scatter transfers.
    pub scatters: u32,
    pub scatter_amount: Amount,
    /// Transfers that could not be sent.
    pub failures: u32,
    /// Accounts that had nothing (or too little) to scatter.
    pub waiting: u32,
    /// Accounts skipped because a backend read failed.
    pub skipped: u32,
}

impl RoundStats {
    /// Fold the outcome of one executed intent into the totals.
    pub fn record(&mut self, intent: &TransferIntent, outcome: &TransferOutcome) {
        match (outcome, intent.kind) {
            (TransferOutcome::Success { amount, .. }, TransferKind::Stake) => {
                self.stakes += 1;
                self.stake_amount = self.stake_amount.saturating_add(*amount);
            }
            (TransferOutcome::Success { amount, .. }, TransferKind::Scatter) => {
                self.scatters += 1;
                self.scatter_amount = self.scatter_amount.saturating_add(*amount);
            }
            (TransferOutcome::Failure { .. }, _) => self.failures += 1,
        }
    }

    /// Number of successful transfers of either kind.
    pub fn transfers(&self) -> u32 {
        self.stakes + self.scatters
    }
}
