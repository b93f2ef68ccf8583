//! Private key provisioning for new scatter accounts.
//!
//! A key is 32 bytes from the OS cryptographic RNG, hashed once with SHA-256
//! and encoded as Base58Check with the network's secret-key version byte:
//! `version || hash || checksum`, where the checksum is the first four bytes
//! of the double SHA-256 of `version || hash`. The wallet backend imports
//! the string as-is.
//!
//! Keys are never persisted here. Once imported, the backend's wallet store
//! is the only place the private material can be recovered from.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::constants::{CHECKSUM_LEN, KEY_ENTROPY_BYTES};
use crate::error::KeyError;
use crate::network::Network;
use crate::traits::KeySource;

/// An encoded private key, ready for `importprivkey`.
///
/// The encoded string is zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial {
    encoded: String,
}

impl KeyMaterial {
    /// Generate a fresh key from the OS cryptographic RNG.
    pub fn generate(network: Network) -> Result<Self, KeyError> {
        Self::generate_with(&mut OsRng, network)
    }

    /// Generate a fresh key from the given cryptographic RNG.
    ///
    /// Fails only if the RNG cannot supply entropy.
    pub fn generate_with<R: RngCore + CryptoRng>(
        rng: &mut R,
        network: Network,
    ) -> Result<Self, KeyError> {
        let mut entropy = Zeroizing::new([0u8; KEY_ENTROPY_BYTES]);
        rng.try_fill_bytes(&mut entropy[..])
            .map_err(|e| KeyError::Entropy(e.to_string()))?;
        let secret: Zeroizing<[u8; 32]> = Zeroizing::new(Sha256::digest(&entropy[..]).into());
        Ok(Self::from_secret(&secret, network))
    }

    /// Encode an existing 32-byte secret for the given network.
    pub fn from_secret(secret: &[u8; 32], network: Network) -> Self {
        Self {
            encoded: encode_checked(network.secret_key_version(), secret),
        }
    }

    /// The Base58Check string to hand to the backend. Handle with care.
    pub fn as_str(&self) -> &str {
        &self.encoded
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("encoded", &"[REDACTED]")
            .finish()
    }
}

/// [`KeySource`] backed by the OS cryptographic RNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsKeySource;

impl KeySource for OsKeySource {
    fn generate(&self, network: Network) -> Result<KeyMaterial, KeyError> {
        KeyMaterial::generate(network)
    }
}

fn encode_checked(version: u8, payload: &[u8]) -> String {
    let mut data = Zeroizing::new(Vec::with_capacity(1 + payload.len() + CHECKSUM_LEN));
    data.push(version);
    data.extend_from_slice(payload);
    let first = Sha256::digest(&data[..]);
    let second = Sha256::digest(first);
    data.extend_from_slice(&second[..CHECKSUM_LEN]);
    bs58::encode(&data[..]).into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic stand-in for the OS RNG.
    struct ConstRng(u8);

    impl RngCore for ConstRng {
        fn next_u32(&mut self) -> u32 {
            u32::from_le_bytes([self.0; 4])
        }
        fn next_u64(&mut self) -> u64 {
            u64::from_le_bytes([self.0; 8])
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(self.0);
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    impl CryptoRng for ConstRng {}

    struct BrokenRng;

    impl RngCore for BrokenRng {
        fn next_u32(&mut self) -> u32 {
            0
        }
        fn next_u64(&mut self) -> u64 {
            0
        }
        fn fill_bytes(&mut self, _dest: &mut [u8]) {}
        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new(std::io::Error::other("entropy pool closed")))
        }
    }

    impl CryptoRng for BrokenRng {}

    fn decode(key: &KeyMaterial) -> Vec<u8> {
        bs58::decode(key.as_str()).into_vec().unwrap()
    }

    #[test]
    fn known_mainnet_encoding() {
        let key = KeyMaterial::from_secret(&[0x11; 32], Network::Mainnet);
        assert_eq!(
            key.as_str(),
            "58E5eLW8YHy1CE7oEUKSFQ7uS74B8ryRqfBakuFiwFA4XqqoXrp"
        );
    }

    #[test]
    fn known_testnet_encoding() {
        let key = KeyMaterial::from_secret(&[0x11; 32], Network::Testnet);
        assert_eq!(
            key.as_str(),
            "91iS7EZqPeRGqPXcPiKLtbfjfLVUYYj17oQ54H3iFFw3n1UmZSS"
        );
    }

    #[test]
    fn payload_layout_and_checksum() {
        let key = KeyMaterial::generate(Network::Mainnet).unwrap();
        let raw = decode(&key);
        assert_eq!(raw.len(), 1 + 32 + CHECKSUM_LEN);
        assert_eq!(raw[0], Network::Mainnet.secret_key_version());

        let (body, checksum) = raw.split_at(1 + 32);
        let expected = Sha256::digest(Sha256::digest(body));
        assert_eq!(checksum, &expected[..CHECKSUM_LEN]);
    }

    #[test]
    fn testnet_uses_testnet_version() {
        let key = KeyMaterial::generate(Network::Testnet).unwrap();
        assert_eq!(decode(&key)[0], Network::Testnet.secret_key_version());
    }

    #[test]
    fn secret_is_hash_of_entropy() {
        let key = KeyMaterial::generate_with(&mut ConstRng(7), Network::Mainnet).unwrap();
        let hash: [u8; 32] =
            hex::decode("4bb06f8e4e3a7715d201d573d0aa423762e55dabd61a2c02278fa56cc6d294e0")
                .unwrap()
                .try_into()
                .unwrap();
        let expected = KeyMaterial::from_secret(&hash, Network::Mainnet);
        assert_eq!(key.as_str(), expected.as_str());
    }

    #[test]
    fn generated_keys_are_unique() {
        let a = KeyMaterial::generate(Network::Mainnet).unwrap();
        let b = KeyMaterial::generate(Network::Mainnet).unwrap();
        assert_ne!(a.as_str(), b.as_str());
    }

    #[test]
    fn entropy_failure_is_reported() {
        let err = KeyMaterial::generate_with(&mut BrokenRng, Network::Mainnet).unwrap_err();
        assert!(matches!(err, KeyError::Entropy(ref msg) if msg.contains("entropy pool closed")));
    }

    #[test]
    fn os_key_source_generates_for_network() {
        let key = OsKeySource.generate(Network::Testnet).unwrap();
        assert_eq!(decode(&key)[0], Network::Testnet.secret_key_version());
    }

    #[test]
    fn debug_hides_key() {
        let key = KeyMaterial::from_secret(&[0x11; 32], Network::Mainnet);
        let debug = format!("{key:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(key.as_str()));
    }
}
