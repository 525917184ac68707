//! Payment IDs carried in transaction extra nonces
//!
//! Receivers sharing one address use a 32-byte payment ID to tell deposits
//! apart. The ID travels in the transaction's extra nonce blob, tagged with
//! a one-byte discriminator.

use crypto::Hash256;

/// Nonce-blob tag marking a plain 32-byte payment ID
pub const TX_EXTRA_NONCE_PAYMENT_ID: u8 = 0x00;

/// Maximum length of an extra nonce blob
pub const TX_EXTRA_NONCE_MAX_COUNT: usize = 255;

/// Builds the extra nonce blob carrying `payment_id`
pub fn set_payment_id_to_extra_nonce(payment_id: &Hash256) -> Vec<u8> {
    let mut nonce = Vec::with_capacity(33);
    nonce.push(TX_EXTRA_NONCE_PAYMENT_ID);
    nonce.extend_from_slice(payment_id.data());
    nonce
}

/// Extracts a payment ID from an extra nonce blob, if one is present
pub fn get_payment_id_from_extra_nonce(nonce: &[u8]) -> Option<Hash256> {
    if nonce.len() != 33 || nonce[0] != TX_EXTRA_NONCE_PAYMENT_ID {
        return None;
    }
    let mut data = [0; 32];
    data.copy_from_slice(&nonce[1..]);
    Some(Hash256::from(data))
}

/// Parses a payment ID from its 64-character hex form
pub fn parse_payment_id(payment_id_str: &str) -> Option<Hash256> {
    Hash256::from_hex(payment_id_str).ok()
}
