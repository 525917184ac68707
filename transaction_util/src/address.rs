//! Human-readable account addresses
//!
//! An address packs the network tag and both public keys into a checked
//! Base58 string: `base58(varint(tag) ‖ spend_public ‖ view_public ‖ checksum)`.

use base58_monero::base58::Error as Base58Error;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crypto::ecc::CompressedPoint;
use crypto::PublicKey;

/// Network tag used to recognize an address from its string form
pub trait AddressPrefixes {
    /// Tag for a standard address
    const STANDARD: u64;
}

/// The pair of public keys a sender needs to pay an account
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize, Debug)]
pub struct Address {
    /// Public spend key
    pub spend_public_key: PublicKey,
    /// Public view key
    pub view_public_key: PublicKey,
}

/// Error type for address operations
#[derive(Error, Debug)]
pub enum Error {
    /// Returned when the address cannot be decoded correctly
    #[error("Invalid address encoding")]
    InvalidEncoding(#[from] Base58Error),

    /// Returned when the network tag is not this network's
    #[error("Invalid address prefix")]
    InvalidPrefix,

    /// Returned when the payload is not two well-formed curve points
    #[error("Invalid address keys")]
    InvalidKeys,
}

impl Address {
    /// Builds the standard address over the given public keys
    pub fn standard(spend_public_key: PublicKey, view_public_key: PublicKey) -> Self {
        Address {
            spend_public_key,
            view_public_key,
        }
    }

    /// Parses a human-readable Caligo address
    pub fn from_address_string<TPrefix: AddressPrefixes>(data: &str) -> Result<Self, Error> {
        let data = base58_monero::decode_check(data)?;

        let (tag, tag_end) = varint::deserialize(&data).map_err(|_| Error::InvalidKeys)?;
        if tag != TPrefix::STANDARD {
            return Err(Error::InvalidPrefix);
        }
        if data.len() != tag_end + 64 {
            return Err(Error::InvalidKeys);
        }

        let decompress = |bytes: &[u8]| -> Result<PublicKey, Error> {
            let mut buf = [0; 32];
            buf.copy_from_slice(bytes);
            CompressedPoint(buf).decompress().ok_or(Error::InvalidKeys)
        };

        Ok(Address {
            spend_public_key: decompress(&data[tag_end..tag_end + 32])?,
            view_public_key: decompress(&data[tag_end + 32..tag_end + 64])?,
        })
    }

    /// Renders this address as a human-readable Caligo address
    pub fn to_address_string<TPrefix: AddressPrefixes>(&self) -> String {
        let mut address = Vec::with_capacity(73);

        address.extend_from_slice(&varint::serialize(TPrefix::STANDARD));
        address.extend_from_slice(self.spend_public_key.compress().as_bytes());
        address.extend_from_slice(self.view_public_key.compress().as_bytes());

        base58_monero::encode_check(&address).unwrap()
    }
}
