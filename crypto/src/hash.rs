use std::fmt;

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256Full};

/// Raw bytes of a 256-bit hash
pub type Hash256Data = [u8; 32];

/// A 256-bit hash value
///
/// Used for block IDs, transaction IDs and payment IDs
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hash256(Hash256Data);

impl Hash256 {
    /// The all-zero hash
    pub fn null_hash() -> Hash256 {
        Hash256([0; 32])
    }

    /// Parses a hash from its 64-character hex representation
    pub fn from_hex(data: &str) -> Result<Hash256, hex::FromHexError> {
        let data = hex::decode(data)?;
        if data.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut hash = [0; 32];
        hash.copy_from_slice(&data);
        Ok(Hash256(hash))
    }

    /// The raw bytes of this hash
    pub fn data(&self) -> &Hash256Data {
        &self.0
    }
}

impl From<Hash256Data> for Hash256 {
    fn from(data: Hash256Data) -> Hash256 {
        Hash256(data)
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<{}>", hex::encode(self.0))
    }
}

/// The Cryptonote variant of Keccak-256 (the original Keccak finalist
/// padding, not NIST SHA-3), truncated to 32 bytes
pub struct CNFastHash {
    hasher: Keccak256Full,
}

impl CNFastHash {
    /// Starts an incremental hash
    pub fn new() -> CNFastHash {
        CNFastHash {
            hasher: Keccak256Full::new(),
        }
    }

    /// Absorbs more data
    pub fn input(&mut self, data: impl AsRef<[u8]>) {
        self.hasher.update(data);
    }

    /// Finalizes the hash
    pub fn result(self) -> Hash256Data {
        let mut hash = [0; 32];
        hash.copy_from_slice(&self.hasher.finalize()[..32]);
        hash
    }

    /// One-shot hash of a byte slice
    pub fn digest(data: &[u8]) -> Hash256Data {
        let mut hash = [0; 32];
        hash.copy_from_slice(&Keccak256Full::digest(data)[..32]);
        hash
    }
}

impl Default for CNFastHash {
    fn default() -> CNFastHash {
        CNFastHash::new()
    }
}
