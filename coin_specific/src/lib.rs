#![deny(missing_docs)]
//! Network parameters for the Caligo mainnet
//!
//! Everything coin-tunable that the generic crates leave open is pinned
//! here: the address tag and the wallet-facing scan parameters.

use serde::{Deserialize, Serialize};

/// Coin name and ticker
pub const COIN_NAME: (&str, &str) = ("Caligo", "CGO");

/// The Caligo mainnet coin definition
#[derive(Serialize, Deserialize)]
pub struct Caligo;

impl transaction_util::address::AddressPrefixes for Caligo {
    const STANDARD: u64 = 0x2b_c817; // CAL
}

impl wallet::WalletParams for Caligo {
    /// 2014-06-08T00:00:00Z, when the network launched. Accounts recovered
    /// from seed are assumed at least this old, forcing a full rescan
    const EARLIEST_ACCOUNT_TIMESTAMP: u64 = 1_402_185_600;
}
