//! Error types shared by the engine and the wallet client.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("negative amount: {0}")] Negative(String),
    #[error("amount is not a finite number")] NonFinite,
    #[error("amount overflow")] Overflow,
    #[error("malformed amount: {0:?}")] Malformed(String),
}

/// Failure of the secure random source. Always fatal: no key can be
/// provisioned safely without entropy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("secure random source failed: {0}")] Entropy(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("transport: {0}")] Transport(String),
    #[error("rpc error {code}: {message}")] Rpc { code: i64, message: String },
    #[error("decode: {0}")] Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_rpc_error() {
        let e = BackendError::Rpc {
            code: -6,
            message: "Insufficient funds".into(),
        };
        assert_eq!(e.to_string(), "rpc error -6: Insufficient funds");
    }

    #[test]
    fn display_entropy_error() {
        let e = KeyError::Entropy("device unavailable".into());
        assert_eq!(
            e.to_string(),
            "secure random source failed: device unavailable"
        );
    }

    #[test]
    fn display_malformed_amount_quotes_input() {
        let e = AmountError::Malformed("1.2.3".into());
        assert_eq!(e.to_string(), "malformed amount: \"1.2.3\"");
    }
}
