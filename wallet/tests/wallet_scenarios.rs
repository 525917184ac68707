//! End-to-end wallet scenarios against an in-memory daemon

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use common::{
    Block, BlockHeader, GetHash, TXExtra, TXIn, TXOut, TXOutTarget, Transaction,
    TransactionPrefix,
};
use crypto::{Hash256, KeyPair};
use node_rpc::{
    BlockEntry, DaemonClient, GetBlocksResponse, GetOIndexesResponse, GetRandomOutsResponse,
    OutEntry, OutsForAmount, SendRawTxResponse, CORE_RPC_STATUS_OK,
};
use transaction_util::address::{Address, AddressPrefixes};
use transaction_util::{payment_id, tx_scanning, AccountKeys, Derivation, TXDestination};
use wallet::{Error, GenerateMode, Wallet, WalletCallbacks, WalletParams};

struct TestCoin;

impl AddressPrefixes for TestCoin {
    const STANDARD: u64 = 0x2b_c817;
}

impl WalletParams for TestCoin {
    const EARLIEST_ACCOUNT_TIMESTAMP: u64 = 1_402_185_600;
}

type TestWallet = Wallet<TestCoin, MockDaemon>;

const BASE_TIMESTAMP: u64 = 1_700_000_000;

// ---------------------------------------------------------------------------
// In-memory daemon

struct DaemonState {
    chain: Vec<(Block, Vec<Transaction>)>,
    forced_pulls: VecDeque<GetBlocksResponse>,
    fail_pulls: usize,
    decoys_per_amount: usize,
    send_status: String,
    sent_txs: Vec<String>,
}

#[derive(Clone)]
struct MockDaemon(Arc<Mutex<DaemonState>>);

impl MockDaemon {
    fn new() -> Self {
        MockDaemon(Arc::new(Mutex::new(DaemonState {
            chain: vec![(Block::genesis(), Vec::new())],
            forced_pulls: VecDeque::new(),
            fail_pulls: 0,
            decoys_per_amount: 50,
            send_status: CORE_RPC_STATUS_OK.to_string(),
            sent_txs: Vec::new(),
        })))
    }

    fn push_block(&self, miner_tx: Transaction, txs: Vec<Transaction>) -> Block {
        let mut state = self.0.lock().unwrap();
        let height = state.chain.len() as u64;
        let prev_id = state
            .chain
            .last()
            .map(|(block, _)| block.get_hash())
            .unwrap_or_else(Hash256::null_hash);

        let block = Block {
            header: BlockHeader {
                major_version: 1,
                minor_version: 0,
                timestamp: BASE_TIMESTAMP + height,
                prev_id,
                nonce: height as u32,
            },
            miner_tx,
            tx_hashes: txs.iter().map(GetHash::get_hash).collect(),
        };
        state.chain.push((block.clone(), txs));
        block
    }

    fn rollback_to(&self, height: usize) {
        self.0.lock().unwrap().chain.truncate(height);
    }

    fn force_pull(&self, response: GetBlocksResponse) {
        self.0.lock().unwrap().forced_pulls.push_back(response);
    }

    fn fail_pulls(&self, count: usize) {
        self.0.lock().unwrap().fail_pulls = count;
    }

    fn set_decoys_per_amount(&self, count: usize) {
        self.0.lock().unwrap().decoys_per_amount = count;
    }

    fn set_send_status(&self, status: &str) {
        self.0.lock().unwrap().send_status = status.to_string();
    }

    fn sent_tx_count(&self) -> usize {
        self.0.lock().unwrap().sent_txs.len()
    }
}

fn block_entry(block: &Block, txs: &[Transaction]) -> BlockEntry {
    BlockEntry {
        block: bincode::serialize(block).unwrap(),
        txs: txs.iter().map(|tx| bincode::serialize(tx).unwrap()).collect(),
    }
}

impl DaemonClient for MockDaemon {
    fn get_blocks(
        &mut self,
        block_ids: &[Hash256],
        _start_height: u64,
    ) -> node_rpc::Result<GetBlocksResponse> {
        let mut state = self.0.lock().unwrap();
        if state.fail_pulls > 0 {
            state.fail_pulls -= 1;
            return Err(node_rpc::Error::Connection("injected failure".to_string()));
        }
        if let Some(response) = state.forced_pulls.pop_front() {
            return Ok(response);
        }

        // Serve from the most recent block the wallet also knows
        let mut split = 0;
        for (height, (block, _)) in state.chain.iter().enumerate() {
            if block_ids.contains(&block.get_hash()) {
                split = height;
            }
        }

        let blocks = state.chain[split..]
            .iter()
            .map(|(block, txs)| block_entry(block, txs))
            .collect();
        Ok(GetBlocksResponse {
            start_height: split as u64,
            blocks,
            status: CORE_RPC_STATUS_OK.to_string(),
        })
    }

    fn get_o_indexes(&mut self, txid: &Hash256) -> node_rpc::Result<GetOIndexesResponse> {
        let state = self.0.lock().unwrap();

        // Global per-amount indices in chain order, coinbase first
        let mut counters: HashMap<u64, u64> = HashMap::new();
        for (block, txs) in &state.chain {
            for tx in std::iter::once(&block.miner_tx).chain(txs.iter()) {
                let mut indexes = Vec::with_capacity(tx.prefix.outputs.len());
                for output in &tx.prefix.outputs {
                    let counter = counters.entry(output.amount).or_insert(0);
                    indexes.push(*counter);
                    *counter += 1;
                }
                if tx.get_hash() == *txid {
                    return Ok(GetOIndexesResponse {
                        o_indexes: indexes,
                        status: CORE_RPC_STATUS_OK.to_string(),
                    });
                }
            }
        }

        Ok(GetOIndexesResponse {
            o_indexes: Vec::new(),
            status: CORE_RPC_STATUS_OK.to_string(),
        })
    }

    fn get_random_outs(
        &mut self,
        amounts: &[u64],
        outs_count: u64,
    ) -> node_rpc::Result<GetRandomOutsResponse> {
        let state = self.0.lock().unwrap();
        let available = state.decoys_per_amount.min(outs_count as usize);

        let outs = amounts
            .iter()
            .map(|&amount| OutsForAmount {
                amount,
                outs: (0..available)
                    .map(|i| OutEntry {
                        // Far above any real index this chain could assign
                        global_amount_index: 1_000 + i as u64,
                        out_key: KeyPair::generate().public_key,
                    })
                    .collect(),
            })
            .collect();

        Ok(GetRandomOutsResponse {
            outs,
            status: CORE_RPC_STATUS_OK.to_string(),
        })
    }

    fn send_raw_transaction(&mut self, tx_as_hex: &str) -> node_rpc::Result<SendRawTxResponse> {
        let mut state = self.0.lock().unwrap();
        state.sent_txs.push(tx_as_hex.to_string());
        Ok(SendRawTxResponse {
            status: state.send_status.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Fixtures

fn stranger_keys() -> AccountKeys {
    AccountKeys::from(KeyPair::generate().secret_key)
}

fn tx_paying(keys: &AccountKeys, inputs: Vec<TXIn>, amounts: &[u64]) -> (Transaction, KeyPair) {
    let tx_keypair = KeyPair::generate();
    let derivation = Derivation::from(&tx_keypair.secret_key, &keys.view_keypair.public_key);

    let outputs = amounts
        .iter()
        .enumerate()
        .map(|(i, &amount)| TXOut {
            amount,
            target: TXOutTarget::ToKey {
                key: derivation.derive_public_key(i as u64, &keys.spend_keypair.public_key),
            },
        })
        .collect();

    let tx = Transaction {
        prefix: TransactionPrefix {
            version: 1,
            unlock_time: 0,
            inputs,
            outputs,
            extra: vec![TXExtra::TxPublicKey(tx_keypair.public_key)],
        },
        signatures: Vec::new(),
    };
    (tx, tx_keypair)
}

fn coinbase_paying(keys: &AccountKeys, amount: u64, height: u64) -> (Transaction, KeyPair) {
    tx_paying(keys, vec![TXIn::Gen(height)], &[amount])
}

fn filler_block(daemon: &MockDaemon, height: u64) -> Block {
    let (miner_tx, _) = coinbase_paying(&stranger_keys(), 100, height);
    daemon.push_block(miner_tx, Vec::new())
}

/// Genesis + one block paying `amounts` to the account via its coinbase
/// being a stranger's and a regular tx carrying the payment
fn recovered_wallet_with_funds(
    dir: &tempfile::TempDir,
    amounts: &[u64],
    mature: bool,
) -> (TestWallet, MockDaemon, AccountKeys) {
    let daemon = MockDaemon::new();
    let seed = KeyPair::generate().secret_key;
    let account_keys = AccountKeys::from(seed);

    let (pay_tx, _) = tx_paying(&account_keys, Vec::new(), amounts);
    let (miner_tx, _) = coinbase_paying(&stranger_keys(), 100, 1);
    daemon.push_block(miner_tx, vec![pay_tx]);

    if mature {
        for height in 2..13 {
            filler_block(&daemon, height);
        }
    }

    let (mut wallet, _) = TestWallet::generate(
        dir.path().join("wallet"),
        "pw",
        daemon.clone(),
        GenerateMode::Recover(seed),
    )
    .unwrap();
    wallet.refresh(0).unwrap();

    (wallet, daemon, account_keys)
}

// ---------------------------------------------------------------------------
// S1: fresh recover + scan

#[test]
fn s1_fresh_recover_and_scan() {
    let daemon = MockDaemon::new();
    let seed = KeyPair::generate().secret_key;
    let account_keys = AccountKeys::from(seed);

    let (miner_tx, _) = coinbase_paying(&account_keys, 10, 1);
    daemon.push_block(miner_tx, Vec::new());

    let dir = tempfile::tempdir().unwrap();
    let (mut wallet, _) = TestWallet::generate(
        dir.path().join("wallet"),
        "pw",
        daemon.clone(),
        GenerateMode::Recover(seed),
    )
    .unwrap();

    let fetched = wallet.refresh(0).unwrap();
    assert_eq!(fetched, 1);
    assert_eq!(wallet.balance(), 10);
    assert_eq!(wallet.get_transfers().len(), 1);
    assert_eq!(wallet.key_image_count(), 1);
    assert_eq!(wallet.get_blockchain_current_height(), 2);
}

// ---------------------------------------------------------------------------
// S2: spend detection

#[test]
fn s2_spend_detection() {
    let dir = tempfile::tempdir().unwrap();
    let (mut wallet, daemon, account_keys) = recovered_wallet_with_funds(&dir, &[10], false);
    assert_eq!(wallet.balance(), 10);

    let spent_count = Arc::new(AtomicUsize::new(0));
    let spent_count_cb = spent_count.clone();
    wallet.set_callbacks(WalletCallbacks {
        on_money_spent: Box::new(move |_, _, _, _| {
            spent_count_cb.fetch_add(1, Ordering::SeqCst);
        }),
        ..Default::default()
    });

    // Spend the single owned output in a block mined by a stranger
    let transfers = wallet.get_transfers();
    let source_tx_key = transfers[0].tx.prefix.tx_public_key().unwrap();
    let (_, key_image) = tx_scanning::generate_key_image_helper(&account_keys, &source_tx_key, 0);

    let (mut spend_tx, _) = tx_paying(&stranger_keys(), Vec::new(), &[9]);
    spend_tx.prefix.inputs.push(TXIn::ToKey {
        amount: 10,
        key_offsets: vec![0],
        key_image,
    });

    let (miner_tx, _) = coinbase_paying(&stranger_keys(), 100, 2);
    daemon.push_block(miner_tx, vec![spend_tx]);

    wallet.refresh(0).unwrap();
    assert_eq!(wallet.balance(), 0);
    assert!(wallet.get_transfers()[0].spent);
    assert_eq!(spent_count.load(Ordering::SeqCst), 1);
}

// ---------------------------------------------------------------------------
// S3: reorg handling

#[test]
fn s3_fork_at_response_start_is_an_internal_error() {
    let dir = tempfile::tempdir().unwrap();
    let (mut wallet, daemon, _) = recovered_wallet_with_funds(&dir, &[10], false);

    // A response whose first block already disagrees with our chain at its
    // own start height is inconsistent with the history we sent
    let (competing_miner, _) = coinbase_paying(&stranger_keys(), 999, 1);
    let competing = Block {
        header: BlockHeader {
            major_version: 1,
            minor_version: 0,
            timestamp: BASE_TIMESTAMP + 777,
            prev_id: Block::genesis().get_hash(),
            nonce: 777,
        },
        miner_tx: competing_miner,
        tx_hashes: Vec::new(),
    };
    daemon.force_pull(GetBlocksResponse {
        start_height: 1,
        blocks: vec![block_entry(&competing, &[])],
        status: CORE_RPC_STATUS_OK.to_string(),
    });

    assert!(matches!(wallet.refresh(0), Err(Error::InternalError(_))));
}

#[test]
fn s3_reorg_detaches_and_reapplies() {
    let dir = tempfile::tempdir().unwrap();
    let (mut wallet, daemon, account_keys) = recovered_wallet_with_funds(&dir, &[10], false);

    // Height 2 pays us 5 on the soon-to-be-orphaned branch
    let (pay_tx, _) = tx_paying(&account_keys, Vec::new(), &[5]);
    let (miner_tx, _) = coinbase_paying(&stranger_keys(), 100, 2);
    daemon.push_block(miner_tx, vec![pay_tx]);
    wallet.refresh(0).unwrap();
    assert_eq!(wallet.balance(), 15);
    assert_eq!(wallet.get_blockchain_current_height(), 3);

    // The daemon reorganizes: height 2 is replaced by a block that does not
    // pay us, and the new branch is one block longer
    daemon.rollback_to(2);
    let (miner_tx, _) = coinbase_paying(&stranger_keys(), 123, 2);
    daemon.push_block(miner_tx, Vec::new());
    filler_block(&daemon, 3);

    wallet.refresh(0).unwrap();

    // The transfer confirmed at height 1 survives; the orphaned one is gone
    assert_eq!(wallet.balance(), 10);
    assert_eq!(wallet.get_transfers().len(), 1);
    assert_eq!(wallet.key_image_count(), 1);
    assert_eq!(wallet.get_blockchain_current_height(), 4);
}

// ---------------------------------------------------------------------------
// S4: mixin shortage

#[test]
fn s4_mixin_shortage() {
    let dir = tempfile::tempdir().unwrap();
    let (mut wallet, daemon, _) = recovered_wallet_with_funds(&dir, &[10_000], true);
    daemon.set_decoys_per_amount(5);

    let destination = TXDestination {
        amount: 5_000,
        addr: Address::standard(
            KeyPair::generate().public_key,
            KeyPair::generate().public_key,
        ),
    };

    assert!(matches!(
        wallet.create_transactions(vec![destination], 10, 0, 100, Vec::new()),
        Err(Error::NotEnoughOutsToMix)
    ));
}

// ---------------------------------------------------------------------------
// S5: split retry

#[test]
fn s5_split_retry_returns_three_transactions() {
    let dir = tempfile::tempdir().unwrap();
    let (mut wallet, _, _) = recovered_wallet_with_funds(&dir, &[400, 400, 400, 400], true);
    assert_eq!(wallet.balance(), 1_600);

    // Tight enough that one and two-input transactions both overflow it,
    // while the one-input-per-transaction 3-way split fits
    wallet.init(420);

    let destination = TXDestination {
        amount: 900,
        addr: Address::standard(
            KeyPair::generate().public_key,
            KeyPair::generate().public_key,
        ),
    };

    let ptxs = wallet
        .create_transactions(vec![destination], 0, 0, 100, Vec::new())
        .unwrap();

    assert_eq!(ptxs.len(), 3);

    // Slices of the one destination sum back to the original amount
    let paid: u64 = ptxs
        .iter()
        .flat_map(|ptx| ptx.tx.prefix.outputs.iter())
        .map(|out| out.amount)
        .sum();
    let change: u64 = ptxs
        .iter()
        .map(|ptx| ptx.change_dts.as_ref().map(|c| c.amount).unwrap_or(0))
        .sum();
    assert_eq!(paid, 900 + change);

    // Nothing is durably reserved until commit
    assert!(wallet.get_transfers().iter().all(|td| !td.spent));
}

#[test]
fn split_attempts_exhaust_into_tx_too_big() {
    let dir = tempfile::tempdir().unwrap();
    let (mut wallet, _, _) = recovered_wallet_with_funds(&dir, &[50_000], true);

    // No split can ever fit a transaction in 10 bytes
    wallet.init(10);

    let destination = TXDestination {
        amount: 30_000,
        addr: Address::standard(
            KeyPair::generate().public_key,
            KeyPair::generate().public_key,
        ),
    };

    assert!(matches!(
        wallet.create_transactions(vec![destination], 0, 0, 100, Vec::new()),
        Err(Error::TxTooBig)
    ));
    assert!(wallet.get_transfers().iter().all(|td| !td.spent));
}

// ---------------------------------------------------------------------------
// S6: unconfirmed eviction

#[test]
fn s6_unconfirmed_eviction() {
    let dir = tempfile::tempdir().unwrap();
    let (mut wallet, daemon, _) = recovered_wallet_with_funds(&dir, &[1_000], true);
    assert_eq!(wallet.balance(), 1_000);

    let destination = TXDestination {
        amount: 500,
        addr: Address::standard(
            KeyPair::generate().public_key,
            KeyPair::generate().public_key,
        ),
    };
    let ptxs = wallet
        .create_transactions(vec![destination], 0, 0, 100, Vec::new())
        .unwrap();
    assert_eq!(ptxs.len(), 1);

    wallet.commit_txs(&ptxs).unwrap();
    assert_eq!(daemon.sent_tx_count(), 1);

    // The input is spent; only the in-flight change remains
    assert_eq!(wallet.balance(), 400);

    // The network confirms our transaction
    let (miner_tx, _) = coinbase_paying(&stranger_keys(), 100, 13);
    daemon.push_block(miner_tx, vec![ptxs[0].tx.clone()]);
    wallet.refresh(0).unwrap();

    // The unconfirmed entry is evicted and the change arrives as a real
    // transfer; no double counting
    assert_eq!(wallet.balance(), 400);
    let transfers = wallet.get_transfers();
    assert!(transfers.iter().any(|td| !td.spent && td.amount() == 400));
}

#[test]
fn rejected_transactions_leave_no_trace() {
    let dir = tempfile::tempdir().unwrap();
    let (mut wallet, daemon, _) = recovered_wallet_with_funds(&dir, &[1_000], true);

    let destination = TXDestination {
        amount: 500,
        addr: Address::standard(
            KeyPair::generate().public_key,
            KeyPair::generate().public_key,
        ),
    };
    let ptxs = wallet
        .create_transactions(vec![destination], 0, 0, 100, Vec::new())
        .unwrap();

    daemon.set_send_status("Failed");
    assert!(matches!(
        wallet.commit_tx(&ptxs[0]),
        Err(Error::TxRejected(_))
    ));

    // The input stays spendable and no change is pretended
    assert_eq!(wallet.balance(), 1_000);
    assert!(wallet.get_transfers().iter().all(|td| !td.spent));
}

// ---------------------------------------------------------------------------
// Retry behavior

#[test]
fn three_pull_failures_are_swallowed() {
    let dir = tempfile::tempdir().unwrap();
    let (mut wallet, daemon, account_keys) = recovered_wallet_with_funds(&dir, &[10], false);

    let (pay_tx, _) = tx_paying(&account_keys, Vec::new(), &[7]);
    let (miner_tx, _) = coinbase_paying(&stranger_keys(), 100, 2);
    daemon.push_block(miner_tx, vec![pay_tx]);

    daemon.fail_pulls(3);
    wallet.refresh(0).unwrap();
    assert_eq!(wallet.balance(), 17);
}

#[test]
fn the_fourth_pull_failure_propagates() {
    let dir = tempfile::tempdir().unwrap();
    let (mut wallet, daemon, _) = recovered_wallet_with_funds(&dir, &[10], false);

    daemon.fail_pulls(4);
    assert!(matches!(
        wallet.refresh(0),
        Err(Error::NoConnectionToDaemon(_))
    ));
}

// ---------------------------------------------------------------------------
// Timestamp skip heuristic

#[test]
fn blocks_older_than_the_account_are_skipped() {
    let daemon = MockDaemon::new();
    let seed = KeyPair::generate().secret_key;
    let account_keys = AccountKeys::from(seed);

    // A block stamped long before even the recovery pin, paying the account
    let (pay_tx, _) = tx_paying(&account_keys, Vec::new(), &[10]);
    let (miner_tx, _) = coinbase_paying(&stranger_keys(), 100, 1);
    daemon.push_block(miner_tx, vec![pay_tx]);
    daemon.0.lock().unwrap().chain[1].0.header.timestamp = 1_000;

    let dir = tempfile::tempdir().unwrap();
    let (mut wallet, _) = TestWallet::generate(
        dir.path().join("wallet"),
        "pw",
        daemon.clone(),
        GenerateMode::Recover(seed),
    )
    .unwrap();

    wallet.refresh(0).unwrap();
    assert_eq!(wallet.balance(), 0);
    assert_eq!(wallet.get_transfers().len(), 0);
    // The block itself still joined the chain
    assert_eq!(wallet.get_blockchain_current_height(), 2);
}

// ---------------------------------------------------------------------------
// Payment IDs

#[test]
fn payments_are_indexed_by_payment_id() {
    let daemon = MockDaemon::new();
    let seed = KeyPair::generate().secret_key;
    let account_keys = AccountKeys::from(seed);

    let id = Hash256::from([0x42; 32]);
    let (mut pay_tx, _) = tx_paying(&account_keys, Vec::new(), &[25]);
    pay_tx
        .prefix
        .extra
        .push(TXExtra::TxNonce(payment_id::set_payment_id_to_extra_nonce(
            &id,
        )));

    let (miner_tx, _) = coinbase_paying(&stranger_keys(), 100, 1);
    daemon.push_block(miner_tx, vec![pay_tx]);

    let dir = tempfile::tempdir().unwrap();
    let (mut wallet, _) = TestWallet::generate(
        dir.path().join("wallet"),
        "pw",
        daemon.clone(),
        GenerateMode::Recover(seed),
    )
    .unwrap();
    wallet.refresh(0).unwrap();

    let payments = wallet.get_payments(&id, 0);
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].amount, 25);
    assert_eq!(payments[0].block_height, 1);

    // min_height filters payments at or below it
    assert!(wallet.get_payments(&id, 1).is_empty());
    assert!(wallet.get_payments(&Hash256::from([0x43; 32]), 0).is_empty());
}

// ---------------------------------------------------------------------------
// Persistence across restart

#[test]
fn snapshot_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let (wallet, daemon, _) = recovered_wallet_with_funds(&dir, &[10, 20], false);
    assert_eq!(wallet.balance(), 30);
    wallet.store().unwrap();
    let address = wallet.get_account_address_base58();
    drop(wallet);

    let mut reloaded =
        TestWallet::load(dir.path().join("wallet"), "pw", daemon.clone()).unwrap();
    assert_eq!(reloaded.get_account_address_base58(), address);
    assert_eq!(reloaded.balance(), 30);
    assert_eq!(reloaded.get_transfers().len(), 2);
    assert_eq!(reloaded.key_image_count(), 2);

    // Nothing new to fetch: the restored short history matches the daemon
    assert_eq!(reloaded.refresh(0).unwrap(), 0);
}

#[test]
fn mismatched_snapshot_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let daemon = MockDaemon::new();

    let (wallet_a, _) = TestWallet::generate(
        dir.path().join("a"),
        "pw",
        daemon.clone(),
        GenerateMode::Recoverable,
    )
    .unwrap();
    let (_wallet_b, _) = TestWallet::generate(
        dir.path().join("b"),
        "pw",
        daemon.clone(),
        GenerateMode::Recoverable,
    )
    .unwrap();
    drop(wallet_a);

    // Wallet A's snapshot with wallet B's keys file
    std::fs::copy(dir.path().join("a"), dir.path().join("b")).unwrap();
    assert!(matches!(
        TestWallet::load(dir.path().join("b"), "pw", daemon.clone()),
        Err(Error::MismatchedFiles(_))
    ));
}

// ---------------------------------------------------------------------------
// Stop flag

#[test]
fn stop_prevents_further_pulls() {
    let dir = tempfile::tempdir().unwrap();
    let (mut wallet, daemon, account_keys) = recovered_wallet_with_funds(&dir, &[10], false);

    let (pay_tx, _) = tx_paying(&account_keys, Vec::new(), &[7]);
    let (miner_tx, _) = coinbase_paying(&stranger_keys(), 100, 2);
    daemon.push_block(miner_tx, vec![pay_tx]);

    wallet.stop();
    assert_eq!(wallet.refresh(0).unwrap(), 0);
    assert_eq!(wallet.balance(), 10);
}
