//! Protocol and naming constants. All monetary values in base units (1 coin = 10^8 units).

/// Base units per whole coin.
pub const COIN: u64 = 100_000_000;

/// Number of fractional digits carried by every amount sent to the backend.
pub const AMOUNT_DECIMALS: usize = 8;

/// Confirmation depth used for spendable balances and sends unless configured otherwise.
pub const DEFAULT_CONFIRMATIONS: u32 = 6;

/// Size in bytes of the random material hashed into a private key.
pub const KEY_ENTROPY_BYTES: usize = 32;

/// Base58Check version byte for mainnet private key imports.
pub const MAINNET_SECRET_KEY_VERSION: u8 = 123;

/// Base58Check version byte for testnet private key imports.
pub const TESTNET_SECRET_KEY_VERSION: u8 = 239;

/// Length of the Base58Check checksum suffix.
pub const CHECKSUM_LEN: usize = 4;

/// Zero-padded width of the sequence number in scatter account names.
pub const ACCOUNT_SEQUENCE_WIDTH: usize = 4;

/// Mainnet RPC ports start with these digits; any other port selects testnet.
pub const MAINNET_PORT_PREFIX: &str = "10";

/// Default wallet RPC port (mainnet).
pub const DEFAULT_RPC_PORT: u16 = 10617;
