use serde::{Deserialize, Serialize};

use crypto::{tree_hash, Hash256};

use crate::{
    config, fix_historical_anomalies, GetHash, TXExtra, TXIn, TXOut, TXOutTarget, Transaction,
    TransactionPrefix,
};

/// Header of a block
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct BlockHeader {
    /// Hard-fork version this block was mined under
    pub major_version: u8,
    /// Voting field for upcoming versions
    pub minor_version: u8,
    /// Mining timestamp (Unix seconds)
    pub timestamp: u64,
    /// Hash of the previous block in the chain
    pub prev_id: Hash256,
    /// Proof-of-work nonce
    pub nonce: u32,
}

/// A complete block
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Block {
    /// This block's header
    pub header: BlockHeader,
    /// The coinbase transaction minting this block's reward
    pub miner_tx: Transaction,
    /// Hashes of all other transactions included in this block
    pub tx_hashes: Vec<Hash256>,
}

impl Block {
    /// Regenerates the constant genesis block
    ///
    /// Every wallet rebuilds this deterministically at open so that height 0
    /// never has to be fetched from a node.
    pub fn genesis() -> Block {
        let miner_tx = Transaction {
            prefix: TransactionPrefix {
                version: 1,
                unlock_time: 0,
                inputs: vec![TXIn::Gen(0)],
                outputs: vec![TXOut {
                    amount: config::GENESIS_BLOCK_REWARD,
                    target: TXOutTarget::ToKey {
                        key: crypto::ecc::hash_to_point(config::GENESIS_COINBASE_TAG),
                    },
                }],
                extra: vec![TXExtra::TxPublicKey(crypto::ecc::hash_to_point(
                    config::GENESIS_TX_PUBKEY_TAG,
                ))],
            },
            signatures: Vec::new(),
        };

        Block {
            header: BlockHeader {
                major_version: 1,
                minor_version: 0,
                timestamp: 0,
                prev_id: Hash256::null_hash(),
                nonce: config::GENESIS_NONCE,
            },
            miner_tx,
            tx_hashes: Vec::new(),
        }
    }

    /// The height recorded in this block's coinbase input
    pub fn height(&self) -> Option<u64> {
        match self.miner_tx.prefix.inputs.first() {
            Some(TXIn::Gen(height)) => Some(*height),
            _ => None,
        }
    }
}

impl GetHash for Block {
    fn get_hash_blob(&self) -> Vec<u8> {
        let mut vec = Vec::new();

        // Serialized header
        vec.extend_from_slice(&bincode::serialize(&self.header).unwrap());

        // Tree hash over the coinbase and all included transactions
        let mut hashes = vec![self.miner_tx.get_hash()];
        hashes.extend_from_slice(&self.tx_hashes);
        if let Some(height) = self.height() {
            fix_historical_anomalies(height, &mut hashes);
        }
        vec.extend_from_slice(tree_hash(&hashes).data());

        // Transaction count, coinbase included
        vec.extend_from_slice(&varint::serialize(self.tx_hashes.len() as u64 + 1));

        vec
    }
}
