//! Cryptonote ring signatures
//!
//! A ring signature over a set of candidate public keys proves knowledge of
//! the secret key for exactly one of them without revealing which. The key
//! image binds the signature to the spent output, making double spends
//! detectable.

use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ecc::{self, Scalar, BASEPOINT_TABLE};
use crate::hash::{CNFastHash, Hash256};
use crate::keys::{KeyImage, PublicKey, SecretKey};

/// One ring member's portion of a signature
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize, Debug)]
pub struct Signature {
    /// Challenge share
    pub c: Scalar,
    /// Response
    pub r: Scalar,
}

/// Error type for ring signature generation
#[derive(Error, Debug, PartialEq)]
pub enum Error {
    /// Returned when the ring is empty
    #[error("Ring contains no members")]
    EmptyRing,

    /// Returned when the real index points outside the ring
    #[error("Real member index is beyond the ring")]
    IndexOutOfBounds,

    /// Returned when the secret key does not open the ring member at the
    /// real index
    #[error("Secret key does not match the real ring member")]
    KeyMismatch,
}

fn challenge(
    prefix_hash: &Hash256,
    commitments_l: &[ecc::Point],
    commitments_r: &[ecc::Point],
) -> Scalar {
    let mut hasher = CNFastHash::new();
    hasher.input(prefix_hash.data());
    for point in commitments_l.iter().chain(commitments_r.iter()) {
        hasher.input(point.compress().as_bytes());
    }
    ecc::hash_to_scalar(hasher.result())
}

/// Signs `prefix_hash` with a ring of candidate output keys
///
/// `real_index` selects the ring member whose secret is `secret_key`;
/// `key_image` must be `secret_key * H_p(ring[real_index])`.
pub fn sign(
    prefix_hash: &Hash256,
    key_image: &KeyImage,
    ring: &[PublicKey],
    secret_key: &SecretKey,
    real_index: usize,
) -> Result<Vec<Signature>, Error> {
    if ring.is_empty() {
        return Err(Error::EmptyRing);
    }
    if real_index >= ring.len() {
        return Err(Error::IndexOutOfBounds);
    }
    if secret_key * BASEPOINT_TABLE != ring[real_index] {
        return Err(Error::KeyMismatch);
    }

    let mut signatures = vec![
        Signature {
            c: Scalar::ZERO,
            r: Scalar::ZERO,
        };
        ring.len()
    ];
    let mut commitments_l = vec![ecc::BASEPOINT; ring.len()];
    let mut commitments_r = vec![ecc::BASEPOINT; ring.len()];

    // Decoy members get random challenge/response pairs; the real member
    // gets a plain Schnorr commitment whose challenge is fixed up below
    let nonce = Scalar::random(&mut OsRng);
    let mut challenge_sum = Scalar::ZERO;
    for (i, member) in ring.iter().enumerate() {
        let base = ecc::hash_to_point(member.compress().as_bytes());
        if i == real_index {
            commitments_l[i] = &nonce * BASEPOINT_TABLE;
            commitments_r[i] = nonce * base;
        } else {
            let c = Scalar::random(&mut OsRng);
            let r = Scalar::random(&mut OsRng);
            commitments_l[i] = &r * BASEPOINT_TABLE + c * member;
            commitments_r[i] = r * base + c * key_image;
            signatures[i] = Signature { c, r };
            challenge_sum += c;
        }
    }

    let c = challenge(prefix_hash, &commitments_l, &commitments_r);
    let c_real = c - challenge_sum;
    signatures[real_index] = Signature {
        c: c_real,
        r: nonce - c_real * secret_key,
    };

    Ok(signatures)
}

/// Verifies a ring signature produced by [`sign`]
pub fn verify(
    prefix_hash: &Hash256,
    key_image: &KeyImage,
    ring: &[PublicKey],
    signatures: &[Signature],
) -> bool {
    if ring.is_empty() || ring.len() != signatures.len() {
        return false;
    }

    let mut commitments_l = Vec::with_capacity(ring.len());
    let mut commitments_r = Vec::with_capacity(ring.len());
    let mut challenge_sum = Scalar::ZERO;
    for (member, signature) in ring.iter().zip(signatures.iter()) {
        let base = ecc::hash_to_point(member.compress().as_bytes());
        commitments_l.push(&signature.r * BASEPOINT_TABLE + signature.c * member);
        commitments_r.push(signature.r * base + signature.c * key_image);
        challenge_sum += signature.c;
    }

    challenge(prefix_hash, &commitments_l, &commitments_r) == challenge_sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyPair;

    fn key_image_for(keypair: &KeyPair) -> KeyImage {
        keypair.secret_key * ecc::hash_to_point(keypair.public_key.compress().as_bytes())
    }

    #[test]
    fn it_signs_and_verifies() {
        let keypair = KeyPair::generate();
        let real_index = 2;

        let mut ring: Vec<PublicKey> = (0..5).map(|_| KeyPair::generate().public_key).collect();
        ring[real_index] = keypair.public_key;

        let key_image = key_image_for(&keypair);
        let prefix_hash = Hash256::from(CNFastHash::digest(b"prefix"));

        let signatures = sign(
            &prefix_hash,
            &key_image,
            &ring,
            &keypair.secret_key,
            real_index,
        )
        .unwrap();

        assert_eq!(signatures.len(), ring.len());
        assert!(verify(&prefix_hash, &key_image, &ring, &signatures));
    }

    #[test]
    fn it_rejects_wrong_message() {
        let keypair = KeyPair::generate();
        let ring = vec![keypair.public_key];
        let key_image = key_image_for(&keypair);

        let prefix_hash = Hash256::from(CNFastHash::digest(b"prefix"));
        let signatures = sign(&prefix_hash, &key_image, &ring, &keypair.secret_key, 0).unwrap();

        let other_hash = Hash256::from(CNFastHash::digest(b"other"));
        assert!(!verify(&other_hash, &key_image, &ring, &signatures));
    }

    #[test]
    fn it_rejects_wrong_key_image() {
        let keypair = KeyPair::generate();
        let ring = vec![keypair.public_key];
        let key_image = key_image_for(&keypair);

        let prefix_hash = Hash256::from(CNFastHash::digest(b"prefix"));
        let signatures = sign(&prefix_hash, &key_image, &ring, &keypair.secret_key, 0).unwrap();

        let forged_image = key_image_for(&KeyPair::generate());
        assert!(!verify(&prefix_hash, &forged_image, &ring, &signatures));
    }

    #[test]
    fn it_rejects_mismatched_secret() {
        let keypair = KeyPair::generate();
        let ring = vec![KeyPair::generate().public_key];
        let key_image = key_image_for(&keypair);
        let prefix_hash = Hash256::from(CNFastHash::digest(b"prefix"));

        assert_eq!(
            sign(&prefix_hash, &key_image, &ring, &keypair.secret_key, 0),
            Err(Error::KeyMismatch)
        );
        assert_eq!(
            sign(&prefix_hash, &key_image, &ring, &keypair.secret_key, 1),
            Err(Error::IndexOutOfBounds)
        );
    }
}
