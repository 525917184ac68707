#![deny(missing_docs)]
//! Cryptographic primitives used by the Caligo wallet
//!
//! Everything here is deterministic given its inputs; randomness enters only
//! through `KeyPair::generate` and ring signature nonces.

/// ChaCha8 keystream helpers for the encrypted keys file
pub mod chacha;
/// Common elliptic curve operations
pub mod ecc;
mod hash;
mod keys;
/// Ring signatures over transaction prefix hashes
pub mod ring_signature;
mod tree_hash;

pub use hash::{CNFastHash, Hash256, Hash256Data};
pub use keys::{KeyImage, KeyPair, PublicKey, ScalarExt, SecretKey};
pub use tree_hash::tree_hash;
