//! Output recognition and key image recovery
//!
//! Given the account's view secret and spend keys, decides which outputs of a
//! transaction belong to the account and recovers the one-time secret needed
//! to spend each of them.

use thiserror::Error;

use common::{TXOutTarget, TransactionPrefix};
use crypto::{ecc, KeyImage, KeyPair, PublicKey};

use crate::{account_keys::AccountKeys, derivation::Derivation};

/// Error type for transaction scanning
#[derive(Error, Debug, PartialEq)]
pub enum Error {
    /// Returned when the transaction's extra field carries no public key
    #[error("Public key missing from transaction extra")]
    MissingPubKey,
}

/// One output recognized as belonging to the scanning account
pub struct OwnedOutput {
    /// Index of the output within the transaction
    pub output_index: usize,
    /// Amount carried by the output
    pub amount: u64,
    /// The recovered one-time keypair that spends the output
    pub ephemeral_keypair: KeyPair,
    /// The output's key image
    pub key_image: KeyImage,
}

/// Computes the key image of a one-time keypair
///
/// `I = x · H_p(P)`, the double-spend tag the network indexes
pub fn key_image(ephemeral_keypair: &KeyPair) -> KeyImage {
    ephemeral_keypair.secret_key
        * ecc::hash_to_point(ephemeral_keypair.public_key.compress().as_bytes())
}

/// Recovers the one-time keypair and key image for an output known to be
/// addressed to `account_keys`
///
/// Used by the builder when spending: the source transaction's public key and
/// the output's position in it determine the ephemeral secret.
pub fn generate_key_image_helper(
    account_keys: &AccountKeys,
    tx_public_key: &PublicKey,
    output_index: u64,
) -> (KeyPair, KeyImage) {
    let derivation = Derivation::from(&account_keys.view_keypair.secret_key, tx_public_key);
    let ephemeral_keypair = KeyPair::from(
        derivation.derive_secret_key(output_index, &account_keys.spend_keypair.secret_key),
    );
    let image = key_image(&ephemeral_keypair);
    (ephemeral_keypair, image)
}

/// Finds all outputs of `tx` addressed to `account_keys`
///
/// Returns the recognized outputs along with the total amount received. The
/// shared derivation is computed once per transaction; each output then costs
/// one hash and one basepoint multiplication to test.
///
/// # Errors
/// `MissingPubKey` when the transaction carries no public key in its extra
/// field; callers treat such transactions as skipped.
pub fn lookup_account_outputs(
    account_keys: &AccountKeys,
    tx: &TransactionPrefix,
) -> Result<(Vec<OwnedOutput>, u64), Error> {
    let tx_public_key = tx.tx_public_key().ok_or(Error::MissingPubKey)?;

    // aR = arG, shared with the sender's rV
    let derivation = Derivation::from(&account_keys.view_keypair.secret_key, &tx_public_key);

    let mut owned = Vec::new();
    let mut money_received = 0;
    for (output_index, output) in tx.outputs.iter().enumerate() {
        let TXOutTarget::ToKey { key } = output.target;

        let expected =
            derivation.derive_public_key(output_index as u64, &account_keys.spend_keypair.public_key);
        if expected != key {
            continue;
        }

        let ephemeral_keypair = KeyPair::from(
            derivation
                .derive_secret_key(output_index as u64, &account_keys.spend_keypair.secret_key),
        );
        let image = key_image(&ephemeral_keypair);

        log::debug!(
            "Output {} is ours, key image <{}>",
            output_index,
            hex::encode(image.compress().as_bytes())
        );

        money_received += output.amount;
        owned.push(OwnedOutput {
            output_index,
            amount: output.amount,
            ephemeral_keypair,
            key_image: image,
        });
    }

    Ok((owned, money_received))
}
