//! Request and response shapes for the four daemon operations

use serde::{Deserialize, Serialize};

use crypto::{Hash256, PublicKey};

/// Daemon status string for a successful call
pub const CORE_RPC_STATUS_OK: &str = "OK";
/// Daemon status string while the daemon is syncing or otherwise occupied
pub const CORE_RPC_STATUS_BUSY: &str = "BUSY";

/// One block of a batched chain pull, as serialized blobs
#[derive(Clone, Default, Serialize, Deserialize, Debug)]
pub struct BlockEntry {
    /// Serialized block
    pub block: Vec<u8>,
    /// Serialized non-coinbase transactions included in the block
    pub txs: Vec<Vec<u8>>,
}

/// Request for `/getblocks.bin`
#[derive(Serialize, Deserialize, Debug)]
pub struct GetBlocksRequest {
    /// Short chain history, dense at the tip and sparse towards genesis
    pub block_ids: Vec<Hash256>,
    /// Height the wallet would like the response to start at
    pub start_height: u64,
}

/// Response to `/getblocks.bin`
#[derive(Clone, Default, Serialize, Deserialize, Debug)]
pub struct GetBlocksResponse {
    /// Height of the first entry in `blocks`
    pub start_height: u64,
    /// Consecutive blocks from `start_height`
    pub blocks: Vec<BlockEntry>,
    /// Daemon status
    pub status: String,
}

/// Request for `/get_o_indexes.bin`
#[derive(Serialize, Deserialize, Debug)]
pub struct GetOIndexesRequest {
    /// Transaction whose output indices are wanted
    pub txid: Hash256,
}

/// Response to `/get_o_indexes.bin`
#[derive(Clone, Default, Serialize, Deserialize, Debug)]
pub struct GetOIndexesResponse {
    /// Global output index of each of the transaction's outputs, in order
    pub o_indexes: Vec<u64>,
    /// Daemon status
    pub status: String,
}

/// Request for `/getrandom_outs.bin`
#[derive(Serialize, Deserialize, Debug)]
pub struct GetRandomOutsRequest {
    /// One entry per selected input, the amount whose decoys are wanted
    pub amounts: Vec<u64>,
    /// Number of decoy candidates wanted per amount
    pub outs_count: u64,
}

/// A single decoy candidate
#[derive(Clone, Copy, Serialize, Deserialize, Debug)]
pub struct OutEntry {
    /// Global index of this output among outputs of the same amount
    pub global_amount_index: u64,
    /// The output's one-time key
    pub out_key: PublicKey,
}

/// Decoy candidates for one requested amount
#[derive(Clone, Default, Serialize, Deserialize, Debug)]
pub struct OutsForAmount {
    /// The amount these candidates carry
    pub amount: u64,
    /// The candidates themselves
    pub outs: Vec<OutEntry>,
}

/// Response to `/getrandom_outs.bin`
#[derive(Clone, Default, Serialize, Deserialize, Debug)]
pub struct GetRandomOutsResponse {
    /// Candidate lists, one per requested amount, in request order
    pub outs: Vec<OutsForAmount>,
    /// Daemon status
    pub status: String,
}

/// Request for `/sendrawtransaction`
#[derive(Serialize, Deserialize, Debug)]
pub struct SendRawTxRequest {
    /// Hex encoding of the serialized transaction
    pub tx_as_hex: String,
}

/// Response to `/sendrawtransaction`
#[derive(Clone, Default, Serialize, Deserialize, Debug)]
pub struct SendRawTxResponse {
    /// Daemon status; anything but OK means the relay failed
    pub status: String,
}
