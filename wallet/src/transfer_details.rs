use serde::{Deserialize, Serialize};

use common::Transaction;
use crypto::{Hash256, KeyImage};
use transaction_util::address::Address;
use transaction_util::TXDestination;

/// One output owned by this account
#[derive(Clone, Serialize, Deserialize)]
pub struct TransferDetails {
    /// Height of the block that confirmed the output
    pub block_height: u64,
    /// The full transaction carrying the output
    pub tx: Transaction,
    /// Index of the output within its transaction
    pub internal_output_index: usize,
    /// Global index of the output among all outputs of the same amount
    pub global_output_index: u64,
    /// Whether this output has been used as a transaction input
    pub spent: bool,
    /// The output's key image, also indexed separately for O(1) spend
    /// detection
    pub key_image: KeyImage,
}

impl TransferDetails {
    /// Amount carried by this output
    pub fn amount(&self) -> u64 {
        self.tx.prefix.outputs[self.internal_output_index].amount
    }
}

/// An incoming payment, indexed by the payment ID it carried
#[derive(Clone, Serialize, Deserialize)]
pub struct PaymentDetails {
    /// Transaction that delivered the payment
    pub tx_hash: Hash256,
    /// Net amount received
    pub amount: u64,
    /// Height of the confirming block
    pub block_height: u64,
    /// Unlock time of the delivering transaction
    pub unlock_time: u64,
}

/// A transaction this wallet sent that has not appeared in a block yet
#[derive(Clone, Serialize, Deserialize)]
pub struct UnconfirmedTransferDetails {
    /// The sent transaction
    pub tx: Transaction,
    /// Change that will come back to this account once confirmed
    pub change: u64,
    /// When the transaction was relayed (Unix seconds)
    pub sent_time: u64,
}

/// How the builder treats sub-threshold change
pub struct TxDustPolicy {
    /// Amounts at or below this are dust
    pub dust_threshold: u64,
    /// Fold dust into the miner fee instead of producing an output
    pub add_to_fee: bool,
    /// Recipient of an explicit dust output when `add_to_fee` is false
    pub addr_for_dust: Option<Address>,
}

impl TxDustPolicy {
    /// The default policy: dust up to `dust_threshold` is folded into the fee
    pub fn new(dust_threshold: u64) -> TxDustPolicy {
        TxDustPolicy {
            dust_threshold,
            add_to_fee: true,
            addr_for_dust: None,
        }
    }
}

/// A constructed transaction the caller has not committed yet
pub struct PendingTx {
    /// The signed transaction
    pub tx: Transaction,
    /// Dust dropped from the change during splitting
    pub dust: u64,
    /// Fee carried by the transaction
    pub fee: u64,
    /// The change destination, if any change is due
    pub change_dts: Option<TXDestination>,
    /// Stable indices into the transfer list of the inputs spent here
    pub selected_transfers: Vec<usize>,
    /// Hex key images of every input, for operator-facing logs
    pub key_images: String,
}
