//! The transaction builder: input selection, decoy interleaving, the
//! split-and-retry loop and commit

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

use common::{money::print_money, GetHash, TXExtra, TXIn};
use node_rpc::{DaemonClient, CORE_RPC_STATUS_BUSY, CORE_RPC_STATUS_OK};
use transaction_util::address::AddressPrefixes;
use transaction_util::{tx_construction, TXDestination, TXSource};

use crate::error::{Error, Result};
use crate::splitting::{self, SplitStrategy};
use crate::transfer_details::{PendingTx, TxDustPolicy, UnconfirmedTransferDetails};
use crate::{Wallet, WalletParams};

// Ceiling on how many ways create_transactions will split before giving up
const MAX_SPLIT_ATTEMPTS: usize = 30;

// Swap-with-last random pop, so selection is uniform without preserving order
fn pop_random_value<T: Copy>(vec: &mut Vec<T>) -> T {
    debug_assert!(!vec.is_empty());

    let idx = rand::thread_rng().gen_range(0..vec.len());
    let res = vec[idx];
    if idx + 1 != vec.len() {
        vec[idx] = vec[vec.len() - 1];
    }
    vec.pop();

    res
}

fn map_construction_error(error: tx_construction::Error) -> Error {
    match error {
        tx_construction::Error::NoDestinations | tx_construction::Error::ZeroAmount => {
            Error::ZeroDestination
        }
        tx_construction::Error::AmountOverflow => Error::TxSumOverflow,
        other => Error::TxNotConstructed(other.to_string()),
    }
}

impl<TCoin, TClient> Wallet<TCoin, TClient>
where
    TCoin: AddressPrefixes + WalletParams,
    TClient: DaemonClient,
{
    /// Randomly draws spendable transfers until they cover `needed_money`
    ///
    /// Transfers above the dust threshold form the main pool; at most one
    /// dust input is drawn, and only when `add_dust` is set (mixin 0), since
    /// dust amounts rarely have enough ring partners.
    fn select_transfers(
        &self,
        needed_money: u64,
        add_dust: bool,
        dust: u64,
    ) -> (u64, Vec<usize>) {
        let mut unused_transfers_indices = Vec::new();
        let mut unused_dust_indices = Vec::new();

        for (i, td) in self.transfers.iter().enumerate() {
            if !td.spent && self.is_transfer_unlocked(td) {
                if dust < td.amount() {
                    unused_transfers_indices.push(i);
                } else {
                    unused_dust_indices.push(i);
                }
            }
        }

        let mut select_one_dust = add_dust && !unused_dust_indices.is_empty();
        let mut found_money = 0;
        let mut selected_transfers = Vec::new();
        while found_money < needed_money
            && (!unused_transfers_indices.is_empty() || !unused_dust_indices.is_empty())
        {
            let idx = if select_one_dust {
                select_one_dust = false;
                pop_random_value(&mut unused_dust_indices)
            } else if !unused_transfers_indices.is_empty() {
                pop_random_value(&mut unused_transfers_indices)
            } else {
                pop_random_value(&mut unused_dust_indices)
            };

            selected_transfers.push(idx);
            found_money += self.transfers[idx].amount();
        }

        (found_money, selected_transfers)
    }

    /// Builds one transaction towards `dsts`, without committing it
    ///
    /// Selects inputs, fetches `mixin_count` decoys per input from the
    /// daemon, splits amounts under `destination_split_strategy` and
    /// `dust_policy`, and ring-signs the result. The returned pending
    /// transaction references its inputs by stable transfer indices; no
    /// spent flags are touched here.
    pub fn transfer(
        &mut self,
        dsts: &[TXDestination],
        mixin_count: usize,
        unlock_time: u64,
        fee: u64,
        extra: Vec<TXExtra>,
        destination_split_strategy: SplitStrategy,
        dust_policy: &TxDustPolicy,
    ) -> Result<PendingTx> {
        if dsts.is_empty() {
            return Err(Error::ZeroDestination);
        }

        let mut needed_money: u64 = fee;
        for dt in dsts {
            if dt.amount == 0 {
                return Err(Error::ZeroDestination);
            }
            needed_money = needed_money
                .checked_add(dt.amount)
                .ok_or(Error::TxSumOverflow)?;
        }

        let (found_money, selected_transfers) =
            self.select_transfers(needed_money, mixin_count == 0, dust_policy.dust_threshold);
        if found_money < needed_money {
            return Err(Error::NotEnoughMoney(format!(
                "found: {}, need: {}",
                print_money(found_money),
                print_money(needed_money)
            )));
        }

        // Decoy sampling: one extra candidate per input so the real output
        // can be dropped from its own ring
        let mut daemon_outs = Vec::new();
        if mixin_count > 0 {
            let mut amounts = Vec::with_capacity(selected_transfers.len());
            for &idx in &selected_transfers {
                let td = &self.transfers[idx];
                if td.tx.prefix.outputs.len() <= td.internal_output_index {
                    return Err(Error::InternalError(format!(
                        "internal_output_index = {} is greater or equal to outputs count = {}",
                        td.internal_output_index,
                        td.tx.prefix.outputs.len()
                    )));
                }
                amounts.push(td.amount());
            }

            let response = self
                .daemon_client
                .get_random_outs(&amounts, mixin_count as u64 + 1)
                .map_err(|e| Error::NoConnectionToDaemon(format!("getrandom_outs.bin: {}", e)))?;
            if response.status == CORE_RPC_STATUS_BUSY {
                return Err(Error::DaemonBusy("getrandom_outs.bin".to_string()));
            }
            if response.status != CORE_RPC_STATUS_OK {
                return Err(Error::GetRandomOutsError(response.status));
            }
            if response.outs.len() != selected_transfers.len() {
                return Err(Error::InternalError(
                    "daemon returned incorrect number of output lists for getrandom_outs.bin"
                        .to_string(),
                ));
            }
            if response
                .outs
                .iter()
                .any(|amount_outs| amount_outs.outs.len() < mixin_count)
            {
                return Err(Error::NotEnoughOutsToMix);
            }

            daemon_outs = response.outs;
        }

        // Assemble one source per selected input, interleaving the real
        // output into its sorted ring position
        let mut sources = Vec::with_capacity(selected_transfers.len());
        for (i, &idx) in selected_transfers.iter().enumerate() {
            let td = &self.transfers[idx];

            let mut outputs: Vec<(u64, crypto::PublicKey)> = Vec::new();
            if !daemon_outs.is_empty() {
                let mut candidates = daemon_outs[i].outs.clone();
                candidates.sort_by_key(|entry| entry.global_amount_index);
                for candidate in &candidates {
                    if candidate.global_amount_index == td.global_output_index {
                        continue;
                    }
                    outputs.push((candidate.global_amount_index, candidate.out_key));
                    if outputs.len() >= mixin_count {
                        break;
                    }
                }
                // Collisions with the real output may have eaten into the ring
                if outputs.len() < mixin_count {
                    return Err(Error::NotEnoughOutsToMix);
                }
            }

            let real_key = match td.tx.prefix.outputs[td.internal_output_index].target {
                common::TXOutTarget::ToKey { key } => key,
            };
            let insert_at = outputs
                .iter()
                .position(|(global_index, _)| *global_index >= td.global_output_index)
                .unwrap_or(outputs.len());
            outputs.insert(insert_at, (td.global_output_index, real_key));

            let real_out_tx_key = td.tx.prefix.tx_public_key().ok_or_else(|| {
                Error::InternalError("selected transfer's tx has no public key".to_string())
            })?;

            let src = TXSource {
                amount: td.amount(),
                outputs,
                real_output: insert_at,
                real_output_in_tx_index: td.internal_output_index as u64,
                real_out_tx_key,
            };
            log::debug!(
                "amount={}, real_output={}, real_output_in_tx_index={}",
                print_money(src.amount),
                src.real_output,
                src.real_output_in_tx_index
            );
            sources.push(src);
        }

        let change_dts = if needed_money < found_money {
            Some(TXDestination {
                amount: found_money - needed_money,
                addr: self.get_account_address(),
            })
        } else {
            None
        };

        let (mut splitted_dsts, dust) =
            destination_split_strategy(dsts, change_dts.as_ref(), dust_policy.dust_threshold);
        if dust_policy.dust_threshold < dust {
            return Err(Error::InternalError(format!(
                "invalid dust value: dust = {}, dust_threshold = {}",
                dust, dust_policy.dust_threshold
            )));
        }
        if dust != 0 && !dust_policy.add_to_fee {
            let addr_for_dust = dust_policy.addr_for_dust.ok_or_else(|| {
                Error::InternalError("dust policy has no dust address".to_string())
            })?;
            splitted_dsts.push(TXDestination {
                amount: dust,
                addr: addr_for_dust,
            });
        }

        let tx = tx_construction::construct_tx(
            &self.account.keys,
            &sources,
            &splitted_dsts,
            extra,
            unlock_time,
        )
        .map_err(map_construction_error)?;

        let blob = bincode::serialize(&tx)
            .map_err(|e| Error::InternalError(format!("tx serialize: {}", e)))?;
        if self.upper_transaction_size_limit <= blob.len() as u64 {
            return Err(Error::TxTooBig);
        }

        let mut key_images = String::new();
        for input in &tx.prefix.inputs {
            match input {
                TXIn::ToKey { key_image, .. } => {
                    key_images.push_str(&hex::encode(key_image.compress().as_bytes()));
                    key_images.push(' ');
                }
                TXIn::Gen(_) => return Err(Error::UnexpectedTxinType),
            }
        }

        Ok(PendingTx {
            tx,
            dust,
            fee,
            change_dts,
            selected_transfers,
            key_images,
        })
    }

    /// Builds as many transactions as needed to pay `dsts`
    ///
    /// Starts with a single transaction; whenever one comes back `TxTooBig`,
    /// every destination amount is re-partitioned into one more near-equal
    /// slice and the whole batch is rebuilt, up to 30 attempts. Spent flags
    /// set while queueing a batch are rolled back on every exit path — only
    /// [`Wallet::commit_tx`] durably marks inputs spent.
    pub fn create_transactions(
        &mut self,
        dsts: Vec<TXDestination>,
        mixin_count: usize,
        unlock_time: u64,
        fee: u64,
        extra: Vec<TXExtra>,
    ) -> Result<Vec<PendingTx>> {
        let mut attempt_count = 1;

        loop {
            let split_values = splitting::split_amounts(&dsts, attempt_count);
            if split_values.len() != attempt_count {
                return Err(Error::InternalError(
                    "splitting transactions returned a number of potential tx not equal to what was requested"
                        .to_string(),
                ));
            }

            let mut ptx_vector: Vec<PendingTx> = Vec::new();
            let mut batch_result = Ok(());
            for dst_vector in &split_values {
                match self.transfer(
                    dst_vector,
                    mixin_count,
                    unlock_time,
                    fee,
                    extra.clone(),
                    splitting::digit_split_strategy,
                    &TxDustPolicy::new(fee),
                ) {
                    Ok(ptx) => {
                        // Reserve these inputs so the next slice in the batch
                        // cannot pick them again
                        for &idx in &ptx.selected_transfers {
                            self.transfers[idx].spent = true;
                        }
                        ptx_vector.push(ptx);
                    }
                    Err(error) => {
                        batch_result = Err(error);
                        break;
                    }
                }
            }

            // Whatever happened, un-reserve: commit is the only place spent
            // flags survive
            for ptx in &ptx_vector {
                for &idx in &ptx.selected_transfers {
                    self.transfers[idx].spent = false;
                }
            }

            match batch_result {
                Ok(()) => return Ok(ptx_vector),
                Err(Error::TxTooBig) if attempt_count < MAX_SPLIT_ATTEMPTS => {
                    attempt_count += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }

    /// Relays a pending transaction and records its effects
    ///
    /// On daemon acceptance the transaction joins the unconfirmed table
    /// (its change counts toward the balance until the scanner sees it
    /// confirmed) and every selected input is marked spent.
    pub fn commit_tx(&mut self, ptx: &PendingTx) -> Result<()> {
        let blob = bincode::serialize(&ptx.tx)
            .map_err(|e| Error::InternalError(format!("tx serialize: {}", e)))?;

        let response = self
            .daemon_client
            .send_raw_transaction(&hex::encode(blob))
            .map_err(|e| Error::NoConnectionToDaemon(format!("sendrawtransaction: {}", e)))?;
        if response.status == CORE_RPC_STATUS_BUSY {
            return Err(Error::DaemonBusy("sendrawtransaction".to_string()));
        }
        if response.status != CORE_RPC_STATUS_OK {
            return Err(Error::TxRejected(response.status));
        }

        let tx_hash = ptx.tx.get_hash();
        let sent_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.unconfirmed_txs.insert(
            tx_hash,
            UnconfirmedTransferDetails {
                tx: ptx.tx.clone(),
                change: ptx.change_dts.as_ref().map(|c| c.amount).unwrap_or(0),
                sent_time,
            },
        );

        for &idx in &ptx.selected_transfers {
            self.transfers[idx].spent = true;
        }

        log::info!(
            "Transaction successfully sent. <{:?}> Commission: {} (dust: {}), balance: {}, key_images: [{}]",
            tx_hash,
            print_money(ptx.fee + ptx.dust),
            print_money(ptx.dust),
            print_money(self.balance()),
            ptx.key_images
        );
        Ok(())
    }

    /// Commits a batch of pending transactions in order
    pub fn commit_txs(&mut self, ptx_vector: &[PendingTx]) -> Result<()> {
        for ptx in ptx_vector {
            self.commit_tx(ptx)?;
        }
        Ok(())
    }
}
