//! Transfer execution with per-intent failure isolation.

use scatter_core::{TransferIntent, TransferKind, TransferOutcome, WalletBackend};
use tracing::{info, warn};

/// Sends transfer intents through the wallet backend.
///
/// Every backend error is folded into [`TransferOutcome::Failure`], so the
/// caller keeps iterating without any error handling of its own.
pub struct TransferExecutor<'a, B: ?Sized> {
    backend: &'a B,
}

impl<'a, B: WalletBackend + ?Sized> TransferExecutor<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    pub async fn execute(&self, intent: &TransferIntent) -> TransferOutcome {
        let result = self
            .backend
            .send_from(
                &intent.source,
                &intent.destination,
                intent.amount,
                intent.confirmations,
            )
            .await;

        match result {
            Ok(txid) => {
                let verb = match intent.kind {
                    TransferKind::Stake => "Staked",
                    TransferKind::Scatter => "Scattered",
                };
                info!(
                    kind = %intent.kind,
                    source = %intent.source,
                    recipient = %intent.recipient,
                    amount = %intent.amount,
                    %txid,
                    "{verb} {} to {}.",
                    intent.amount,
                    intent.recipient
                );
                TransferOutcome::Success {
                    txid,
                    amount: intent.amount,
                }
            }
            Err(e) => {
                warn!(
                    kind = %intent.kind,
                    source = %intent.source,
                    recipient = %intent.recipient,
                    amount = %intent.amount,
                    error = %e,
                    "Error sending {} transaction: {e}",
                    intent.kind
                );
                TransferOutcome::Failure {
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryBackend;
    use scatter_core::Amount;

    fn stake(amount: &str) -> TransferIntent {
        TransferIntent {
            kind: TransferKind::Stake,
            source: "main".into(),
            destination: "addr-1".into(),
            recipient: "sb-0001".into(),
            amount: amount.parse().unwrap(),
            confirmations: 6,
        }
    }

    #[tokio::test]
    async fn successful_send_reports_amount_and_txid() {
        let backend = MemoryBackend::new();
        backend.fund("main", Amount::from_coins(100).unwrap());
        let executor = TransferExecutor::new(&backend);

        let outcome = executor.execute(&stake("50")).await;

        let TransferOutcome::Success { txid, amount } = outcome else {
            panic!("expected success");
        };
        assert!(!txid.is_empty());
        assert_eq!(amount, Amount::from_coins(50).unwrap());
        assert_eq!(backend.sends().len(), 1);
        assert_eq!(backend.sends()[0].destination, "addr-1");
    }

    #[tokio::test]
    async fn insufficient_funds_becomes_failure() {
        let backend = MemoryBackend::new();
        backend.fund("main", Amount::from_coins(10).unwrap());
        let executor = TransferExecutor::new(&backend);

        let outcome = executor.execute(&stake("50")).await;

        assert!(!outcome.is_success());
        let TransferOutcome::Failure { reason } = outcome else {
            panic!("expected failure");
        };
        assert!(reason.contains("insufficient funds"), "reason: {reason}");
        assert!(backend.sends().is_empty());
    }

    #[tokio::test]
    async fn transport_error_becomes_failure() {
        let backend = MemoryBackend::new();
        backend.fund("main", Amount::from_coins(100).unwrap());
        backend.fail_sends_from("main");
        let executor = TransferExecutor::new(&backend);

        let outcome = executor.execute(&stake("1")).await;
        assert!(matches!(outcome, TransferOutcome::Failure { .. }));
    }
}
