#![deny(missing_docs)]
//! Utilities for building and recognizing Caligo transactions

use crypto::PublicKey;

mod account_keys;
/// Human-readable account addresses
pub mod address;
/// Amount decomposition and offset encoding
pub mod amounts;
mod derivation;
/// Payment IDs carried in transaction extra nonces
pub mod payment_id;
#[cfg(test)]
mod test_definitions;
/// Transaction construction
pub mod tx_construction;
/// Output recognition and key image recovery
pub mod tx_scanning;

pub use account_keys::AccountKeys;
use address::Address;
pub use derivation::Derivation;

/// A source entry for one transaction input: the real spent output plus its
/// ring of decoys
pub struct TXSource {
    /// Amount carried by the spent output
    pub amount: u64,
    /// Ring members as `(global output index, one-time key)` pairs, sorted
    /// by global index ascending
    pub outputs: Vec<(u64, PublicKey)>,
    /// Position of the real output within `outputs`
    pub real_output: usize,
    /// The real output's index inside its parent transaction
    pub real_output_in_tx_index: u64,
    /// Per-transaction public key of the parent transaction
    pub real_out_tx_key: PublicKey,
}

/// A destination entry for a given transaction
#[derive(Clone)]
pub struct TXDestination {
    /// Amount being paid to this destination
    pub amount: u64,
    /// Receiving address
    pub addr: Address,
}
