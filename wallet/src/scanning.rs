//! The chain scanner: incremental pull loop, fork recovery and output
//! detection
//!
//! `refresh` repeatedly asks the daemon for blocks past the wallet's short
//! chain history, runs the output detector over every surviving transaction
//! and maintains the transfer list, key image index and payment index. On a
//! fork it detaches the stale suffix and re-applies the daemon's branch.

use std::sync::atomic::Ordering;
use std::time::{SystemTime, UNIX_EPOCH};

use common::config::{
    CRYPTONOTE_LOCKED_TX_ALLOWED_DELTA_BLOCKS, CRYPTONOTE_LOCKED_TX_ALLOWED_DELTA_SECONDS,
    CRYPTONOTE_MAX_BLOCK_NUMBER, DEFAULT_TX_SPENDABLE_AGE,
};
use common::{money::print_money, Block, GetHash, TXIn, Transaction};
use crypto::Hash256;
use node_rpc::{BlockEntry, DaemonClient, CORE_RPC_STATUS_BUSY, CORE_RPC_STATUS_OK};
use transaction_util::address::AddressPrefixes;
use transaction_util::{payment_id, tx_scanning};

use crate::error::{Error, Result};
use crate::transfer_details::{PaymentDetails, TransferDetails};
use crate::{Wallet, WalletParams};

// Tolerated clock skew when skipping blocks older than the account
const TIMESTAMP_SKIP_GRACE: u64 = 60 * 60 * 24;

fn current_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl<TCoin, TClient> Wallet<TCoin, TClient>
where
    TCoin: AddressPrefixes + WalletParams,
    TClient: DaemonClient,
{
    /// Pulls blocks until the daemon has nothing new, scanning each one
    ///
    /// Returns the number of blocks fetched. Transient pull failures are
    /// retried up to 3 consecutive times; the 4th propagates. A broken
    /// invariant (`InternalError`) propagates immediately. The loop also
    /// exits when [`Wallet::stop`] flips the run flag.
    pub fn refresh(&mut self, start_height: u64) -> Result<usize> {
        let mut blocks_fetched = 0;
        let mut try_count = 0;

        while self.run.load(Ordering::Relaxed) {
            match self.pull_blocks(start_height) {
                Ok(added_blocks) => {
                    blocks_fetched += added_blocks;
                    try_count = 0;
                    if added_blocks == 0 {
                        break;
                    }
                }
                Err(error @ Error::InternalError(_)) => return Err(error),
                Err(error) => {
                    if try_count < 3 {
                        log::warn!("Another try pull_blocks (try_count={}): {}", try_count, error);
                        try_count += 1;
                    } else {
                        log::error!("pull_blocks failed, try_count={}", try_count);
                        return Err(error);
                    }
                }
            }
        }

        log::info!(
            "Refresh done, blocks received: {}, balance: {}, unlocked: {}",
            blocks_fetched,
            print_money(self.balance()),
            print_money(self.unlocked_balance())
        );
        Ok(blocks_fetched)
    }

    /// One batched pull: fetch, classify each returned block as new, known
    /// or fork, and process accordingly
    fn pull_blocks(&mut self, start_height: u64) -> Result<usize> {
        let short_history = self.get_short_chain_history();
        let response = self
            .daemon_client
            .get_blocks(&short_history, start_height)
            .map_err(|e| Error::NoConnectionToDaemon(format!("getblocks.bin: {}", e)))?;
        if response.status == CORE_RPC_STATUS_BUSY {
            return Err(Error::DaemonBusy("getblocks.bin".to_string()));
        }
        if response.status != CORE_RPC_STATUS_OK {
            return Err(Error::GetBlocksError(response.status));
        }

        let mut blocks_added = 0;
        let mut current_index = response.start_height;
        for entry in &response.blocks {
            let block: Block =
                bincode::deserialize(&entry.block).map_err(|_| Error::BlockParseError)?;
            let block_id = block.get_hash();

            if current_index >= self.blockchain.len() as u64 {
                self.process_new_blockchain_entry(&block, entry, block_id, current_index)?;
                blocks_added += 1;
            } else if block_id == self.blockchain[current_index as usize] {
                log::debug!("Block is already in blockchain: {:?}", block_id);
            } else {
                // Fork detected. The daemon must never diverge on the first
                // block of its answer, because that block was chosen from
                // the history we sent it
                if current_index == response.start_height {
                    return Err(Error::InternalError(format!(
                        "wrong daemon response: split starts from the first block in response {:?} \
                         (height {}), local block id at this height: {:?}",
                        block_id, response.start_height, self.blockchain[current_index as usize]
                    )));
                }

                self.detach_blockchain(current_index)?;
                self.process_new_blockchain_entry(&block, entry, block_id, current_index)?;
            }

            current_index += 1;
        }

        Ok(blocks_added)
    }

    /// Scans one new block and appends it to the local chain
    fn process_new_blockchain_entry(
        &mut self,
        block: &Block,
        entry: &BlockEntry,
        block_id: Hash256,
        height: u64,
    ) -> Result<()> {
        // Blocks comfortably older than the account can contain no output of
        // ours; the grace period absorbs user clock error
        if block.header.timestamp + TIMESTAMP_SKIP_GRACE > self.account.creation_timestamp {
            self.process_new_transaction(&block.miner_tx, height)?;
            for tx_blob in &entry.txs {
                let tx: Transaction =
                    bincode::deserialize(tx_blob).map_err(|_| Error::TxParseError)?;
                self.process_new_transaction(&tx, height)?;
            }
            log::debug!("Processed block: {:?}, height {}", block_id, height);
        } else {
            log::debug!(
                "Skipped block by timestamp, height: {}, block time {}, account time {}",
                height,
                block.header.timestamp,
                self.account.creation_timestamp
            );
        }
        self.blockchain.push(block_id);

        (self.callbacks.on_new_block)(height, block);
        Ok(())
    }

    /// Runs the output detector and spend detector over one transaction
    fn process_new_transaction(&mut self, tx: &Transaction, height: u64) -> Result<()> {
        let tx_hash = tx.get_hash();

        // The confirming block evicts our own unconfirmed record
        self.unconfirmed_txs.remove(&tx_hash);

        let (owned_outputs, money_received) =
            match tx_scanning::lookup_account_outputs(&self.account.keys, &tx.prefix) {
                Ok(found) => found,
                Err(tx_scanning::Error::MissingPubKey) => {
                    log::info!(
                        "Public key wasn't found in the transaction extra. Skipping transaction {:?}",
                        tx_hash
                    );
                    (self.callbacks.on_skip_transaction)(height, tx);
                    return Ok(());
                }
            };

        if !owned_outputs.is_empty() && money_received > 0 {
            // The daemon tells us where our outputs sit in the global
            // per-amount ordering; rings are built from these indices later
            let response = self
                .daemon_client
                .get_o_indexes(&tx_hash)
                .map_err(|e| Error::NoConnectionToDaemon(format!("get_o_indexes.bin: {}", e)))?;
            if response.status == CORE_RPC_STATUS_BUSY {
                return Err(Error::DaemonBusy("get_o_indexes.bin".to_string()));
            }
            if response.status != CORE_RPC_STATUS_OK {
                return Err(Error::DaemonError(response.status));
            }
            if response.o_indexes.len() != tx.prefix.outputs.len() {
                return Err(Error::InternalError(format!(
                    "transactions outputs size ({}) does not match get_o_indexes response size ({})",
                    tx.prefix.outputs.len(),
                    response.o_indexes.len()
                )));
            }

            for owned in owned_outputs {
                if tx.prefix.outputs.len() <= owned.output_index {
                    return Err(Error::InternalError(format!(
                        "wrong out in transaction: internal index={}, total_outs={}",
                        owned.output_index,
                        tx.prefix.outputs.len()
                    )));
                }

                let transfer = TransferDetails {
                    block_height: height,
                    tx: tx.clone(),
                    internal_output_index: owned.output_index,
                    global_output_index: response.o_indexes[owned.output_index],
                    spent: false,
                    key_image: owned.key_image,
                };
                let amount = transfer.amount();
                self.transfers.push(transfer);
                self.key_images
                    .insert(owned.key_image.compress(), self.transfers.len() - 1);

                log::info!(
                    "Received money: {}, with tx: {:?}",
                    print_money(amount),
                    tx_hash
                );
                (self.callbacks.on_money_received)(height, tx, owned.output_index);
            }
        }

        // Spend detection: any input whose key image we own marks one of our
        // transfers as spent
        let mut money_spent = 0;
        for input in &tx.prefix.inputs {
            let (amount, key_image) = match input {
                TXIn::ToKey {
                    amount, key_image, ..
                } => (*amount, key_image),
                TXIn::Gen(_) => continue,
            };
            if let Some(&transfer_index) = self.key_images.get(&key_image.compress()) {
                log::info!(
                    "Spent money: {}, with tx: {:?}",
                    print_money(amount),
                    tx_hash
                );
                money_spent += amount;
                self.transfers[transfer_index].spent = true;

                let td = &self.transfers[transfer_index];
                (self.callbacks.on_money_spent)(height, &td.tx, td.internal_output_index, tx);
            }
        }

        // Index the payment if the transaction carried a payment ID and the
        // account came out ahead
        if let Some(nonce) = tx.prefix.extra_nonce() {
            if let Some(id) = payment_id::get_payment_id_from_extra_nonce(nonce) {
                let received = money_received.saturating_sub(money_spent);
                if received > 0 && id != Hash256::null_hash() {
                    let payment = PaymentDetails {
                        tx_hash,
                        amount: received,
                        block_height: height,
                        unlock_time: tx.prefix.unlock_time,
                    };
                    self.payments.entry(id).or_default().push(payment);
                    log::debug!("Payment found: {} / {:?} / {}", id, tx_hash, received);
                }
            }
        }

        Ok(())
    }

    /// Rolls the wallet back to just before `height`
    ///
    /// Drops every transfer confirmed at or above the height together with
    /// its key image, truncates the chain and purges affected payments.
    /// Unconfirmed transactions are deliberately untouched — they were never
    /// part of the detached blocks.
    pub(crate) fn detach_blockchain(&mut self, height: u64) -> Result<()> {
        log::info!("Detaching blockchain on height {}", height);

        let i_start = self
            .transfers
            .iter()
            .position(|td| td.block_height >= height)
            .unwrap_or(self.transfers.len());

        for td in &self.transfers[i_start..] {
            if self.key_images.remove(&td.key_image.compress()).is_none() {
                return Err(Error::InternalError("key image not found".to_string()));
            }
        }
        let transfers_detached = self.transfers.len() - i_start;
        self.transfers.truncate(i_start);

        let blocks_detached = self.blockchain.len() - height as usize;
        self.blockchain.truncate(height as usize);

        for payments in self.payments.values_mut() {
            payments.retain(|payment| payment.block_height < height);
        }
        self.payments.retain(|_, payments| !payments.is_empty());

        log::info!(
            "Detached blockchain on height {}, transfers detached {}, blocks detached {}",
            height,
            transfers_detached,
            blocks_detached
        );
        Ok(())
    }

    /// The sparse hash list sent with every pull so the daemon can find the
    /// divergence point cheaply: ten dense entries at the tip, then
    /// offset-doubling steps back, always ending at genesis
    pub(crate) fn get_short_chain_history(&self) -> Vec<Hash256> {
        let mut ids = Vec::new();
        let sz = self.blockchain.len();
        if sz == 0 {
            return ids;
        }

        let mut current_multiplier = 1;
        let mut current_back_offset = 1;
        let mut genesis_included = false;
        let mut i = 0;
        while current_back_offset < sz {
            ids.push(self.blockchain[sz - current_back_offset]);
            if sz - current_back_offset == 0 {
                genesis_included = true;
            }
            if i < 10 {
                current_back_offset += 1;
            } else {
                current_multiplier *= 2;
                current_back_offset += current_multiplier;
            }
            i += 1;
        }
        if !genesis_included {
            ids.push(self.blockchain[0]);
        }
        ids
    }

    /// Judges an unlock time under the protocol's dual interpretation:
    /// values below the block-number threshold are heights, the rest are
    /// Unix timestamps, each with its fixed grace delta
    pub fn is_tx_spendtime_unlocked(&self, unlock_time: u64) -> bool {
        if unlock_time < CRYPTONOTE_MAX_BLOCK_NUMBER {
            // Interpret as block height
            self.blockchain.len() as u64 - 1 + CRYPTONOTE_LOCKED_TX_ALLOWED_DELTA_BLOCKS
                >= unlock_time
        } else {
            // Interpret as Unix time
            current_time() + CRYPTONOTE_LOCKED_TX_ALLOWED_DELTA_SECONDS >= unlock_time
        }
    }

    /// A transfer is spendable once unlocked and aged past the spendable
    /// window
    pub(crate) fn is_transfer_unlocked(&self, td: &TransferDetails) -> bool {
        if !self.is_tx_spendtime_unlocked(td.tx.prefix.unlock_time) {
            return false;
        }

        if td.block_height + DEFAULT_TX_SPENDABLE_AGE > self.blockchain.len() as u64 {
            return false;
        }

        true
    }
}
