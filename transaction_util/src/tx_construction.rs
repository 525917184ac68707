//! Transaction construction
//!
//! Assembles a ring-signed transaction from selected sources and split
//! destinations. The caller is responsible for choosing inputs, fetching
//! decoys and deciding amounts; this module owns the cryptography.

use thiserror::Error;

use common::{
    config::CURRENT_TRANSACTION_VERSION, GetHash, TXExtra, TXIn, TXOut, TXOutTarget, Transaction,
    TransactionPrefix,
};
use crypto::{ring_signature, KeyPair};

use crate::{
    account_keys::AccountKeys, amounts::absolute_output_offsets_to_relative,
    derivation::Derivation, tx_scanning, TXDestination, TXSource,
};

/// Error type for transaction construction
#[derive(Error, Debug)]
pub enum Error {
    /// Returned when there are no transaction sources
    #[error("No transaction sources")]
    NoSources,

    /// Returned when there are no transaction destinations
    #[error("No transaction destinations")]
    NoDestinations,

    /// Returned when a destination amount is zero
    #[error("Destination with zero amount")]
    ZeroAmount,

    /// Returned when the index of the real output is beyond the ring provided
    #[error("Real output index is beyond the ring")]
    RealIndexOutOfBounds,

    /// Returned when the recovered one-time key does not match the real ring
    /// member, meaning the source was never addressed to this account
    #[error("Derived one-time key does not match the real output")]
    DerivedKeyMismatch,

    /// Returned when summing input or output amounts wraps
    #[error("Amount sum overflows")]
    AmountOverflow,

    /// Returned when the outputs carry more money than the inputs
    #[error("Transaction spends more than it contains as input")]
    ExcessSpending,

    /// Returned when a ring signature could not be produced
    #[error(transparent)]
    RingSignature(#[from] ring_signature::Error),
}

type Result<T> = std::result::Result<T, Error>;

/// Constructs a transaction spending `sources` towards `destinations`
///
/// `extra` is the caller's extra field (payment ID nonces and the like); the
/// fresh per-transaction public key is appended to it. Outputs are written
/// sorted by amount ascending. Inputs keep source order; each gets a ring
/// signature over the prefix hash with the real member at its sorted ring
/// position.
pub fn construct_tx(
    sender_keys: &AccountKeys,
    sources: &[TXSource],
    destinations: &[TXDestination],
    mut extra: Vec<TXExtra>,
    unlock_time: u64,
) -> Result<Transaction> {
    if sources.is_empty() {
        return Err(Error::NoSources);
    }
    if destinations.is_empty() {
        return Err(Error::NoDestinations);
    }

    // Fresh per-transaction keypair (r, R = rG); R rides in extra
    let tx_keypair = KeyPair::generate();
    extra.push(TXExtra::TxPublicKey(tx_keypair.public_key));

    // Recover the one-time secret of every real input and build the wire
    // inputs with delta-encoded ring offsets
    let mut in_amount_sum: u64 = 0;
    let mut inputs = Vec::with_capacity(sources.len());
    let mut input_secrets = Vec::with_capacity(sources.len());
    for source in sources {
        if source.amount == 0 {
            return Err(Error::ZeroAmount);
        }
        if source.real_output >= source.outputs.len() {
            return Err(Error::RealIndexOutOfBounds);
        }
        in_amount_sum = in_amount_sum
            .checked_add(source.amount)
            .ok_or(Error::AmountOverflow)?;

        let (ephemeral_keypair, key_image) = tx_scanning::generate_key_image_helper(
            sender_keys,
            &source.real_out_tx_key,
            source.real_output_in_tx_index,
        );

        // The recovered key must open the real ring member, otherwise this
        // source does not belong to the sender
        if ephemeral_keypair.public_key != source.outputs[source.real_output].1 {
            log::error!(
                "Derived public key mismatch with real output key at ring index {}",
                source.real_output
            );
            return Err(Error::DerivedKeyMismatch);
        }

        let absolute: Vec<u64> = source.outputs.iter().map(|(index, _)| *index).collect();
        inputs.push(TXIn::ToKey {
            amount: source.amount,
            key_offsets: absolute_output_offsets_to_relative(&absolute),
            key_image,
        });
        input_secrets.push(ephemeral_keypair);
    }

    // Outputs are sorted by amount so that denominations, not ordering,
    // carry the information
    let mut destinations = destinations.to_vec();
    destinations.sort_by_key(|dest| dest.amount);

    let mut out_amount_sum: u64 = 0;
    let mut outputs = Vec::with_capacity(destinations.len());
    for (output_index, dest) in destinations.iter().enumerate() {
        if dest.amount == 0 {
            return Err(Error::ZeroAmount);
        }

        // One-time key H_s(rV || idx)G + S, derivable only by the recipient
        let derivation = Derivation::from(&tx_keypair.secret_key, &dest.addr.view_public_key);
        let one_time_key =
            derivation.derive_public_key(output_index as u64, &dest.addr.spend_public_key);

        out_amount_sum = out_amount_sum
            .checked_add(dest.amount)
            .ok_or(Error::AmountOverflow)?;
        outputs.push(TXOut {
            amount: dest.amount,
            target: TXOutTarget::ToKey { key: one_time_key },
        });
    }

    if out_amount_sum > in_amount_sum {
        log::error!(
            "Transaction inputs money ({}) less than outputs money ({})",
            in_amount_sum,
            out_amount_sum
        );
        return Err(Error::ExcessSpending);
    }

    let prefix = TransactionPrefix {
        version: CURRENT_TRANSACTION_VERSION,
        unlock_time,
        inputs,
        outputs,
        extra,
    };

    // Ring-sign the prefix hash once per input
    let prefix_hash = prefix.get_hash();
    let mut signatures = Vec::with_capacity(sources.len());
    for (i, source) in sources.iter().enumerate() {
        let ring: Vec<_> = source.outputs.iter().map(|(_, key)| *key).collect();
        let key_image = match &prefix.inputs[i] {
            TXIn::ToKey { key_image, .. } => *key_image,
            TXIn::Gen(_) => unreachable!("only ToKey inputs are constructed here"),
        };

        signatures.push(ring_signature::sign(
            &prefix_hash,
            &key_image,
            &ring,
            &input_secrets[i].secret_key,
            source.real_output,
        )?);
    }

    Ok(Transaction { prefix, signatures })
}
