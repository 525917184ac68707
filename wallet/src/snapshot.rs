//! Versioned wallet state snapshots
//!
//! The wallet file is a sequence of bincode fields behind a version number.
//! Fields were added over time and readers must accept every historical
//! layout:
//!
//! * version ≥ 5 — blockchain, transfers, account public address, key images
//! * version ≥ 6 — adds unconfirmed transactions
//! * version ≥ 7 — adds payments
//!
//! Writers always emit the latest version. Files below version 5 carried no
//! state this wallet can use and read back as "no snapshot".

use std::collections::HashMap;
use std::io::Cursor;

use serde::de::DeserializeOwned;

use crypto::ecc::CompressedPoint;
use crypto::Hash256;
use transaction_util::address::Address;

use crate::error::{Error, Result};
use crate::transfer_details::{PaymentDetails, TransferDetails, UnconfirmedTransferDetails};

/// The snapshot layout version this implementation writes
pub const SNAPSHOT_VERSION: u32 = 7;

/// The wallet state that survives a restart
pub struct WalletSnapshot {
    /// Ordered best-chain block hashes, index = height
    pub blockchain: Vec<Hash256>,
    /// All owned outputs ever seen
    pub transfers: Vec<TransferDetails>,
    /// Address of the owning account, cross-checked against the keys file
    pub account_public_address: Address,
    /// Key image index into `transfers`
    pub key_images: HashMap<CompressedPoint, usize>,
    /// Sent-but-unconfirmed transactions
    pub unconfirmed_txs: HashMap<Hash256, UnconfirmedTransferDetails>,
    /// Received payments by payment ID
    pub payments: HashMap<Hash256, Vec<PaymentDetails>>,
}

fn write_field<T: serde::Serialize>(buf: &mut Vec<u8>, value: &T) -> Result<()> {
    bincode::serialize_into(&mut *buf, value)
        .map_err(|e| Error::InternalError(format!("snapshot field serialize: {}", e)))
}

fn read_field<T: DeserializeOwned>(cursor: &mut Cursor<&[u8]>) -> Result<T> {
    bincode::deserialize_from(&mut *cursor)
        .map_err(|e| Error::FileReadError(format!("snapshot field: {}", e)))
}

/// Serializes a snapshot at the given layout version
///
/// Production code always passes [`SNAPSHOT_VERSION`]; tests use older
/// versions to exercise the reader's backward compatibility.
pub fn serialize_snapshot(snapshot: &WalletSnapshot, version: u32) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_field(&mut buf, &version)?;

    if version < 5 {
        return Ok(buf);
    }
    write_field(&mut buf, &snapshot.blockchain)?;
    write_field(&mut buf, &snapshot.transfers)?;
    write_field(&mut buf, &snapshot.account_public_address)?;
    write_field(&mut buf, &snapshot.key_images)?;

    if version < 6 {
        return Ok(buf);
    }
    write_field(&mut buf, &snapshot.unconfirmed_txs)?;

    if version < 7 {
        return Ok(buf);
    }
    write_field(&mut buf, &snapshot.payments)?;

    Ok(buf)
}

/// Reads a snapshot of any supported version
///
/// Returns `None` for pre-5 files, which carried nothing usable; the caller
/// keeps its freshly cleared state in that case.
pub fn deserialize_snapshot(bytes: &[u8]) -> Result<Option<WalletSnapshot>> {
    let mut cursor = Cursor::new(bytes);
    let version: u32 = read_field(&mut cursor)?;

    if version < 5 {
        return Ok(None);
    }

    let blockchain = read_field(&mut cursor)?;
    let transfers = read_field(&mut cursor)?;
    let account_public_address = read_field(&mut cursor)?;
    let key_images = read_field(&mut cursor)?;

    let unconfirmed_txs = if version >= 6 {
        read_field(&mut cursor)?
    } else {
        HashMap::new()
    };

    let payments = if version >= 7 {
        read_field(&mut cursor)?
    } else {
        HashMap::new()
    };

    Ok(Some(WalletSnapshot {
        blockchain,
        transfers,
        account_public_address,
        key_images,
        unconfirmed_txs,
        payments,
    }))
}
