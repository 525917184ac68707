#![cfg(test)]
//! Shared fixtures for the wallet unit tests

use std::path::PathBuf;

use common::{TXExtra, TXOut, TXOutTarget, Transaction};
use crypto::{Hash256, KeyPair};
use node_rpc::{
    DaemonClient, GetBlocksResponse, GetOIndexesResponse, GetRandomOutsResponse,
    SendRawTxResponse, CORE_RPC_STATUS_OK,
};
use transaction_util::{tx_scanning, AccountKeys, Derivation};

use crate::transfer_details::TransferDetails;
use crate::{Account, Wallet, WalletParams};

pub struct TestCoin;

impl transaction_util::address::AddressPrefixes for TestCoin {
    const STANDARD: u64 = 0x2b_c817; // CAL
}

impl WalletParams for TestCoin {
    // 2014-06-08, the network's genesis era
    const EARLIEST_ACCOUNT_TIMESTAMP: u64 = 1_402_185_600;
}

/// A daemon that answers every call with an empty OK response
#[derive(Default)]
pub struct MockNode;

impl DaemonClient for MockNode {
    fn get_blocks(
        &mut self,
        _block_ids: &[Hash256],
        _start_height: u64,
    ) -> node_rpc::Result<GetBlocksResponse> {
        Ok(GetBlocksResponse {
            start_height: 0,
            blocks: Vec::new(),
            status: CORE_RPC_STATUS_OK.to_string(),
        })
    }

    fn get_o_indexes(&mut self, _txid: &Hash256) -> node_rpc::Result<GetOIndexesResponse> {
        Ok(GetOIndexesResponse {
            o_indexes: Vec::new(),
            status: CORE_RPC_STATUS_OK.to_string(),
        })
    }

    fn get_random_outs(
        &mut self,
        _amounts: &[u64],
        _outs_count: u64,
    ) -> node_rpc::Result<GetRandomOutsResponse> {
        Ok(GetRandomOutsResponse {
            outs: Vec::new(),
            status: CORE_RPC_STATUS_OK.to_string(),
        })
    }

    fn send_raw_transaction(&mut self, _tx_as_hex: &str) -> node_rpc::Result<SendRawTxResponse> {
        Ok(SendRawTxResponse {
            status: CORE_RPC_STATUS_OK.to_string(),
        })
    }
}

/// A wallet over a fresh recoverable account, not backed by any files
pub fn test_wallet() -> Wallet<TestCoin, MockNode> {
    let (account, _) = Account::create_recoverable();
    Wallet::with_account(
        account,
        MockNode::default(),
        PathBuf::from("caligo-test-wallet"),
        PathBuf::from("caligo-test-wallet.keys"),
    )
}

/// Builds a transaction paying `amounts` to the given account
pub fn tx_paying_keys(keys: &AccountKeys, amounts: &[u64]) -> (Transaction, KeyPair) {
    let tx_keypair = KeyPair::generate();
    let derivation = Derivation::from(&tx_keypair.secret_key, &keys.view_keypair.public_key);

    let mut tx = Transaction::default();
    tx.prefix.version = 1;
    tx.prefix.extra = vec![TXExtra::TxPublicKey(tx_keypair.public_key)];
    for (i, &amount) in amounts.iter().enumerate() {
        tx.prefix.outputs.push(TXOut {
            amount,
            target: TXOutTarget::ToKey {
                key: derivation.derive_public_key(i as u64, &keys.spend_keypair.public_key),
            },
        });
    }
    (tx, tx_keypair)
}

/// Like [`tx_paying_keys`] but addressed to a wallet's account
pub fn tx_paying_wallet(
    wallet: &Wallet<TestCoin, MockNode>,
    amounts: &[u64],
) -> (Transaction, KeyPair) {
    tx_paying_keys(&wallet.account.keys, amounts)
}

/// A wallet holding one mature, unlocked transfer per entry of `amounts`
pub fn funded_wallet(amounts: &[u64]) -> Wallet<TestCoin, MockNode> {
    let mut wallet = test_wallet();

    for (i, &amount) in amounts.iter().enumerate() {
        let (tx, _) = tx_paying_wallet(&wallet, &[amount]);
        let (owned, _) =
            tx_scanning::lookup_account_outputs(&wallet.account.keys, &tx.prefix).unwrap();

        wallet.transfers.push(TransferDetails {
            block_height: 1,
            tx,
            internal_output_index: 0,
            global_output_index: i as u64,
            spent: false,
            key_image: owned[0].key_image,
        });
        wallet
            .key_images
            .insert(owned[0].key_image.compress(), wallet.transfers.len() - 1);
    }

    // Grow the chain well past the spendable age so everything is mature
    while wallet.blockchain.len() < 20 {
        let filler = wallet.blockchain.len() as u8;
        wallet.blockchain.push(Hash256::from([filler; 32]));
    }

    wallet
}
