//! Thin wrappers around the Ed25519 group operations the wallet needs

pub use curve25519_dalek::constants::ED25519_BASEPOINT_POINT as BASEPOINT;
pub use curve25519_dalek::constants::ED25519_BASEPOINT_TABLE as BASEPOINT_TABLE;
pub use curve25519_dalek::edwards::CompressedEdwardsY as CompressedPoint;
pub use curve25519_dalek::edwards::EdwardsPoint as Point;
pub use curve25519_dalek::scalar::Scalar;

use crate::hash::{CNFastHash, Hash256Data};

/// Converts a given hash to a `Scalar`, reducing modulo the curve order
pub fn hash_to_scalar(hash: Hash256Data) -> Scalar {
    Scalar::from_bytes_mod_order(hash)
}

/// Deterministically maps arbitrary bytes to a point on the curve
///
/// Hashes the input, interprets the digest as a compressed point and rehashes
/// until decompression succeeds, then clears the cofactor so the result lies
/// in the prime-order subgroup. Both signer and verifier derive ring
/// basepoints through this map, so it only needs to be deterministic and
/// torsion-free.
pub fn hash_to_point(data: &[u8]) -> Point {
    let mut candidate = CNFastHash::digest(data);
    loop {
        if let Some(point) = CompressedPoint(candidate).decompress() {
            return point.mul_by_cofactor();
        }
        candidate = CNFastHash::digest(&candidate);
    }
}
