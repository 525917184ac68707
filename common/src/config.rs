//! Network-wide consensus constants
//!
//! Values that every Caligo client must agree on. Per-coin tuning that only
//! affects wallets (address tags, scan pins) lives in `coin_specific`.

/// Version written into newly constructed transactions
pub const CURRENT_TRANSACTION_VERSION: u64 = 1;

/// Unlock times below this value are block heights, at or above it they are
/// Unix timestamps. Changing this would fork every wallet's spendability
/// judgement
pub const CRYPTONOTE_MAX_BLOCK_NUMBER: u64 = 500_000_000;

/// Grace period in blocks when judging a height-based unlock time
pub const CRYPTONOTE_LOCKED_TX_ALLOWED_DELTA_BLOCKS: u64 = 1;

/// Grace period in seconds when judging a timestamp-based unlock time
pub const CRYPTONOTE_LOCKED_TX_ALLOWED_DELTA_SECONDS: u64 = 60 * 60 * 24;

/// Confirmations an output needs before the wallet will spend it
pub const DEFAULT_TX_SPENDABLE_AGE: u64 = 10;

/// Number of decimal places in the display unit
pub const DISPLAY_DECIMAL_POINT: usize = 12;

/// Atomic units per displayed coin
pub const COIN: u64 = 1_000_000_000_000;

/// Outputs at or below this amount are uneconomical to spend
pub const DEFAULT_DUST_THRESHOLD: u64 = 5_000_000_000;

/// Default per-transaction fee in atomic units
pub const DEFAULT_FEE: u64 = 5_000_000_000;

/// Reward minted by the genesis coinbase
pub const GENESIS_BLOCK_REWARD: u64 = 17_590_000_000_000;

/// Proof-of-work nonce of the genesis block
pub const GENESIS_NONCE: u32 = 10_000;

/// Domain tag for the genesis coinbase output key
pub const GENESIS_COINBASE_TAG: &[u8] = b"caligo genesis coinbase";

/// Domain tag for the genesis transaction public key
pub const GENESIS_TX_PUBKEY_TAG: &[u8] = b"caligo genesis tx pubkey";

/// Port assumed when a daemon URL does not carry one
pub const RPC_DEFAULT_PORT: u16 = 8080;
