use serde::{Deserialize, Serialize};

use crypto::ring_signature::Signature;
use crypto::{Hash256, KeyImage, PublicKey};

use crate::GetHash;

/// Transaction input
#[derive(Clone, Serialize, Deserialize, Debug)]
pub enum TXIn {
    /// Coinbase input, creating new coins. Contains the height of the block
    /// this transaction belongs to
    Gen(u64),
    /// Spend of an existing "ToKey" output
    ToKey {
        /// Amount being spent
        amount: u64,
        /// Delta-encoded global indices of each ring member
        key_offsets: Vec<u64>,
        /// Key image of the spent output
        key_image: KeyImage,
    },
}

/// Transaction output target
#[derive(Clone, Copy, Serialize, Deserialize, Debug)]
pub enum TXOutTarget {
    /// Pay to a one-time stealth key
    ToKey {
        /// Target public key
        key: PublicKey,
    },
}

/// Transaction output
#[derive(Clone, Copy, Serialize, Deserialize, Debug)]
pub struct TXOut {
    /// Amount of coins in this output
    pub amount: u64,
    /// Transaction output target
    pub target: TXOutTarget,
}

/// Extra information tagged to a transaction
#[derive(Clone, Serialize, Deserialize, Debug)]
pub enum TXExtra {
    /// Per-transaction public key (for output secret key derivation)
    TxPublicKey(PublicKey),
    /// Free-form nonce blob, used to carry payment IDs
    TxNonce(Vec<u8>),
}

/// Transaction prefix: everything that is covered by the ring signatures
#[derive(Clone, Default, Serialize, Deserialize, Debug)]
pub struct TransactionPrefix {
    /// This transaction's version
    pub version: u64,
    /// Block height or Unix timestamp before which outputs are locked
    pub unlock_time: u64,
    /// List of inputs to this transaction
    pub inputs: Vec<TXIn>,
    /// List of outputs in this transaction
    pub outputs: Vec<TXOut>,
    /// Extra information tagged to this transaction
    pub extra: Vec<TXExtra>,
}

/// A complete transaction
#[derive(Clone, Default, Serialize, Deserialize, Debug)]
pub struct Transaction {
    /// This transaction's prefix
    pub prefix: TransactionPrefix,
    /// One ring signature per input, each with one entry per ring member
    pub signatures: Vec<Vec<Signature>>,
}

impl TransactionPrefix {
    /// The per-transaction public key from the extra field, if present
    pub fn tx_public_key(&self) -> Option<PublicKey> {
        self.extra.iter().find_map(|extra| match extra {
            TXExtra::TxPublicKey(key) => Some(*key),
            _ => None,
        })
    }

    /// The first nonce blob from the extra field, if present
    pub fn extra_nonce(&self) -> Option<&[u8]> {
        self.extra.iter().find_map(|extra| match extra {
            TXExtra::TxNonce(nonce) => Some(nonce.as_slice()),
            _ => None,
        })
    }
}

impl GetHash for TransactionPrefix {
    fn get_hash_blob(&self) -> Vec<u8> {
        bincode::serialize(self).unwrap()
    }
}

impl Transaction {
    /// The hash of the prefix alone, used as the ring signature message
    pub fn prefix_hash(&self) -> Hash256 {
        self.prefix.get_hash()
    }
}

impl GetHash for Transaction {
    fn get_hash_blob(&self) -> Vec<u8> {
        bincode::serialize(self).unwrap()
    }
}
