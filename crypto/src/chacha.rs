//! ChaCha8 keystream used for the encrypted wallet keys file
//!
//! The keys file stores a 64-bit IV next to the ciphertext; the cipher key is
//! derived deterministically from the wallet password.

use chacha20::cipher::{KeyIvInit, StreamCipher};
use chacha20::{ChaCha8, Key, Nonce};
use rand::RngCore;

use crate::hash::CNFastHash;

/// Length in bytes of the IV stored in the keys file
pub const IV_LENGTH: usize = 8;

/// The IV persisted alongside the keys file ciphertext
pub type ChaChaIV = [u8; IV_LENGTH];

/// A 256-bit ChaCha8 cipher key
pub type ChaChaKey = [u8; 32];

/// Derives the cipher key from a wallet password
///
/// Deterministic so that the same password always opens the same file
pub fn generate_key(password: &[u8]) -> ChaChaKey {
    CNFastHash::digest(password)
}

/// Generates a fresh random IV for a new keys file
pub fn generate_iv() -> ChaChaIV {
    let mut iv = [0; IV_LENGTH];
    rand::rngs::OsRng.fill_bytes(&mut iv);
    iv
}

/// Applies the ChaCha8 keystream to `buf` in place
///
/// Encryption and decryption are the same operation. The stored 64-bit IV is
/// widened into the cipher's 96-bit nonce with a zero prefix.
pub fn apply(key: &ChaChaKey, iv: &ChaChaIV, buf: &mut [u8]) {
    let mut nonce = [0; 12];
    nonce[4..].copy_from_slice(iv);

    let mut cipher = ChaCha8::new(Key::from_slice(key), Nonce::from_slice(&nonce));
    cipher.apply_keystream(buf);
}
