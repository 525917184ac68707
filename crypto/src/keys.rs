use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::ecc::{Scalar, BASEPOINT_TABLE, Point};

/// An unsigned 256-bit value used as a private key, reduced modulo the curve
/// order. Represented with lowercase letters in protocol notation
pub type SecretKey = Scalar;

/// A point on the elliptic curve, usually obtained by multiplying a secret
/// scalar with the curve basepoint
pub type PublicKey = Point;

/// The double-spend tag of an output: `x * H_p(P)` for one-time keypair
/// `(x, P)`. Globally unique per output
pub type KeyImage = Point;

/// Helper extension trait for `Scalar`
pub trait ScalarExt {
    /// Generates a `Scalar` from a `[u8]` slice, reducing modulo the curve order
    ///
    /// Panics if the slice is not 32 bytes long; callers are expected to pass
    /// hash output
    fn from_slice(data: &[u8]) -> Scalar {
        let mut scalar: [u8; 32] = [0; 32];
        scalar.copy_from_slice(data);
        Scalar::from_bytes_mod_order(scalar)
    }
}

impl ScalarExt for Scalar {}

/// A secret key together with its corresponding public key
#[derive(Clone, Copy, Serialize, Deserialize)]
pub struct KeyPair {
    /// The secret key
    pub secret_key: SecretKey,
    /// The public key
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Generates a random keypair using the OS CSPRNG
    pub fn generate() -> Self {
        let secret_key = Scalar::random(&mut OsRng);

        Self::from(secret_key)
    }
}

impl From<Scalar> for KeyPair {
    fn from(secret_key: SecretKey) -> Self {
        let public_key = &secret_key * BASEPOINT_TABLE;
        Self {
            secret_key,
            public_key,
        }
    }
}
