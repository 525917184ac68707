use crypto::{CNFastHash, Hash256};

/// Gets a hash of an implementor (the Keccak (CNFastHash) hash of the
/// implementor's hashing blob)
pub trait GetHash {
    /// Gets a raw byte-wise representation of the implementor ready for hashing
    fn get_hash_blob(&self) -> Vec<u8>;

    /// Gets the hash of the implementor
    ///
    /// This hash serves as the ID of the implementor
    fn get_hash(&self) -> Hash256 {
        Hash256::from(CNFastHash::digest(&self.get_hash_blob()))
    }
}
