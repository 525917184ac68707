use crypto::ecc::{Point, Scalar, BASEPOINT_TABLE};
use crypto::{CNFastHash, PublicKey, ScalarExt, SecretKey};

/// The ECDH shared point between a transaction key and an account key
///
/// `D = 8 · (secret × public)` is the same whether computed by the sender
/// (`r × V`) or the receiver (`a × R`), which is what lets both sides derive
/// the same one-time output keys.
pub struct Derivation(Point);

impl Derivation {
    /// Computes the shared derivation from one side's secret and the other
    /// side's public key
    pub fn from(scalar: &Scalar, public_key: &PublicKey) -> Self {
        Derivation((scalar * public_key).mul_by_cofactor())
    }

    /// The per-output scalar `H_s(D ‖ varint(output_index))`
    pub fn to_scalar(&self, output_index: u64) -> Scalar {
        let mut hasher = CNFastHash::new();

        hasher.input(self.0.compress().as_bytes());
        hasher.input(varint::serialize(output_index));

        Scalar::from_slice(&hasher.result())
    }

    /// The one-time output key `H_s(D ‖ idx)·G + S` for the given spend
    /// public key
    pub fn derive_public_key(&self, output_index: u64, spend_public_key: &PublicKey) -> PublicKey {
        &self.to_scalar(output_index) * BASEPOINT_TABLE + spend_public_key
    }

    /// The one-time output secret `H_s(D ‖ idx) + b` for the given spend
    /// secret key
    ///
    /// Only valid for outputs addressed to the holder of `spend_secret_key`
    pub fn derive_secret_key(&self, output_index: u64, spend_secret_key: &SecretKey) -> SecretKey {
        self.to_scalar(output_index) + spend_secret_key
    }
}
