//! Wallet JSON-RPC 1.0 client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scatter_core::{Amount, BackendError, WalletBackend};
use scatter_engine::EngineConfig;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

/// [`WalletBackend`] over the wallet daemon's HTTP JSON-RPC interface.
pub struct RpcWallet {
    client: Client,
    endpoint: String,
    user: String,
    password: String,
}

impl RpcWallet {
    pub fn new(config: &EngineConfig, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: config.rpc_url(),
            user: config.user.clone(),
            password: config.password.clone(),
        })
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, BackendError> {
        let body = json!({
            "jsonrpc": "1.0",
            "id": "scatterbrain",
            "method": method,
            "params": params,
        });
        let resp = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.user, Some(&self.password))
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        // Wallet daemons report RPC errors with a 500 status and a JSON body,
        // so the body is read before the status is considered.
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        let payload: Value = match serde_json::from_str(&text) {
            Ok(v) => v,
            Err(_) if !status.is_success() => {
                return Err(BackendError::Transport(format!("HTTP {status}")));
            }
            Err(e) => return Err(BackendError::Decode(e.to_string())),
        };
        decode_response(method, payload)
    }
}

/// Split a JSON-RPC response into its result or its error object.
pub(crate) fn decode_response<T: DeserializeOwned>(method: &str, mut payload: Value) -> Result<T, BackendError> {
    if let Some(err) = payload.get("error").filter(|e| !e.is_null()) {
        let code = err.get("code").and_then(Value::as_i64).unwrap_or(0);
        let message = err
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| err.to_string());
        return Err(BackendError::Rpc { code, message });
    }
    let result = payload
        .get_mut("result")
        .map(Value::take)
        .unwrap_or(Value::Null);
    serde_json::from_value(result).map_err(|e| BackendError::Decode(format!("{method}: {e}")))
}

/// Convert a coin-denominated balance, treating negative balances as empty.
pub(crate) fn balance_from_coins(coins: f64) -> Result<Amount, BackendError> {
    if coins.is_finite() && coins < 0.0 {
        return Ok(Amount::ZERO);
    }
    Amount::from_coins_f64(coins).map_err(|e| BackendError::Decode(e.to_string()))
}

#[async_trait]
impl WalletBackend for RpcWallet {
    async fn get_balance(&self, account: &str, confirmations: u32) -> Result<Amount, BackendError> {
        let coins: f64 = self
            .call("getbalance", json!([account, confirmations]))
            .await?;
        balance_from_coins(coins)
    }

    async fn get_addresses_by_account(&self, account: &str) -> Result<Vec<String>, BackendError> {
        self.call("getaddressesbyaccount", json!([account])).await
    }

    async fn import_priv_key(&self, key: &str, account: &str, rescan: bool) -> Result<(), BackendError> {
        let _: Value = self
            .call("importprivkey", json!([key, account, rescan]))
            .await?;
        Ok(())
    }

    async fn send_from(
        &self,
        source: &str,
        destination: &str,
        amount: Amount,
        confirmations: u32,
    ) -> Result<String, BackendError> {
        self.call(
            "sendfrom",
            json!([source, destination, amount.to_coins_f64(), confirmations]),
        )
        .await
    }
}
