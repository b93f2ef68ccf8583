//! Network selector.
//!
//! The wallet daemon does not report which chain it runs on, so the network
//! is derived from the RPC port: mainnet ports start with `10`, anything
//! else is treated as testnet. The network only affects the version byte of
//! imported private keys.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{MAINNET_PORT_PREFIX, MAINNET_SECRET_KEY_VERSION, TESTNET_SECRET_KEY_VERSION};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Network {
    /// Select the network from the wallet RPC port.
    pub fn from_port(port: u16) -> Self {
        if port.to_string().starts_with(MAINNET_PORT_PREFIX) {
            Network::Mainnet
        } else {
            Network::Testnet
        }
    }

    /// Base58Check version byte for private key imports on this network.
    pub fn secret_key_version(&self) -> u8 {
        match self {
            Network::Mainnet => MAINNET_SECRET_KEY_VERSION,
            Network::Testnet => TESTNET_SECRET_KEY_VERSION,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => f.write_str("mainnet"),
            Network::Testnet => f.write_str("testnet"),
        }
    }
}
