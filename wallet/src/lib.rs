#![deny(missing_docs)]
//! Caligo wallet core
//!
//! Owns the account keys, scans the chain served by an untrusted daemon for
//! outputs addressed to the account, tracks spendable balance and builds
//! ring-signed transactions. All state mutation happens on one logical task;
//! an atomic stop flag lets another task end a running scan between pulls.

use std::collections::HashMap;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use common::{Block, GetHash};
use crypto::ecc::CompressedPoint;
use crypto::{Hash256, SecretKey};
use node_rpc::DaemonClient;
use transaction_util::address::{Address, AddressPrefixes};

/// Account lifecycle and recovery seeds
pub mod account;
mod callbacks;
/// The wallet error taxonomy
pub mod error;
mod keys_file;
mod scanning;
/// Versioned wallet state snapshots
pub mod snapshot;
/// Amount splitting strategies
pub mod splitting;
#[cfg(test)]
mod test_definitions;
mod transfer;
mod transfer_details;

pub use account::Account;
pub use callbacks::WalletCallbacks;
pub use error::{Error, Result};
pub use transfer_details::{
    PaymentDetails, PendingTx, TransferDetails, TxDustPolicy, UnconfirmedTransferDetails,
};

/// Wallet-facing network parameters, implemented by the coin definition
pub trait WalletParams {
    /// Creation timestamp assumed for recovered accounts
    ///
    /// Pinned to the network's genesis era so that a restored wallet rescans
    /// the entire chain instead of trusting a clock
    const EARLIEST_ACCOUNT_TIMESTAMP: u64;
}

/// How [`Wallet::generate`] should obtain the account keys
pub enum GenerateMode {
    /// Fresh account restorable from a single seed
    Recoverable,
    /// Fresh account with independent spend and view secrets
    Unrecoverable,
    /// Restore a recoverable account from its seed
    Recover(SecretKey),
}

/// The default ceiling on serialized transaction size, roughly 125% of the
/// penalty-free block size minus the space reserved for the coinbase
pub fn default_upper_transaction_size_limit() -> u64 {
    const BLOCK_GRANTED_FULL_REWARD_ZONE: u64 = 20_000;
    const COINBASE_BLOB_RESERVED_SIZE: u64 = 600;
    BLOCK_GRANTED_FULL_REWARD_ZONE * 125 / 100 - COINBASE_BLOB_RESERVED_SIZE
}

fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(suffix);
    PathBuf::from(os)
}

/// A Caligo wallet bound to one account, one pair of files and one daemon
///
/// `TCoin` supplies the network parameters; `TClient` is the daemon
/// transport, generic so tests can substitute an in-memory node.
pub struct Wallet<TCoin, TClient>
where
    TCoin: AddressPrefixes + WalletParams,
    TClient: DaemonClient,
{
    pub(crate) account: Account,
    pub(crate) daemon_client: TClient,
    wallet_file: PathBuf,
    keys_file: PathBuf,
    pub(crate) blockchain: Vec<Hash256>,
    pub(crate) transfers: Vec<TransferDetails>,
    pub(crate) key_images: HashMap<CompressedPoint, usize>,
    pub(crate) payments: HashMap<Hash256, Vec<PaymentDetails>>,
    pub(crate) unconfirmed_txs: HashMap<Hash256, UnconfirmedTransferDetails>,
    account_public_address: Address,
    pub(crate) upper_transaction_size_limit: u64,
    pub(crate) run: AtomicBool,
    pub(crate) callbacks: WalletCallbacks,
    _coin: PhantomData<TCoin>,
}

impl<TCoin, TClient> Wallet<TCoin, TClient>
where
    TCoin: AddressPrefixes + WalletParams,
    TClient: DaemonClient,
{
    fn with_account(
        account: Account,
        daemon_client: TClient,
        wallet_file: PathBuf,
        keys_file: PathBuf,
    ) -> Self {
        let account_public_address = account.keys.address();
        let mut wallet = Wallet {
            account,
            daemon_client,
            wallet_file,
            keys_file,
            blockchain: Vec::new(),
            transfers: Vec::new(),
            key_images: HashMap::new(),
            payments: HashMap::new(),
            unconfirmed_txs: HashMap::new(),
            account_public_address,
            upper_transaction_size_limit: default_upper_transaction_size_limit(),
            run: AtomicBool::new(true),
            callbacks: WalletCallbacks::default(),
            _coin: PhantomData,
        };
        wallet.clear();
        wallet
    }

    // Resets chain state to just the regenerated genesis block
    fn clear(&mut self) {
        self.blockchain.clear();
        self.transfers.clear();
        self.key_images.clear();
        self.payments.clear();
        self.unconfirmed_txs.clear();
        self.blockchain.push(Block::genesis().get_hash());
    }

    /// Creates a brand-new wallet at `wallet_path`
    ///
    /// Writes the encrypted keys file, a best-effort address text file and
    /// an initial snapshot. Returns the wallet together with the recovery
    /// seed when `mode` is [`GenerateMode::Recoverable`].
    ///
    /// # Errors
    /// `FileExists` when either target file is already present.
    pub fn generate(
        wallet_path: impl AsRef<Path>,
        password: &str,
        daemon_client: TClient,
        mode: GenerateMode,
    ) -> Result<(Self, Option<SecretKey>)> {
        let wallet_file = wallet_path.as_ref().to_path_buf();
        let keys_file = append_suffix(&wallet_file, ".keys");

        if wallet_file.exists() {
            return Err(Error::FileExists(wallet_file.display().to_string()));
        }
        if keys_file.exists() {
            return Err(Error::FileExists(keys_file.display().to_string()));
        }

        let (account, recovery_seed) = match mode {
            GenerateMode::Recoverable => {
                let (account, seed) = Account::create_recoverable();
                (account, Some(seed))
            }
            GenerateMode::Unrecoverable => (Account::create_unrecoverable(), None),
            GenerateMode::Recover(seed) => (Account::recover::<TCoin>(seed), None),
        };

        keys_file::store_keys_to_file(&keys_file, password, &account)?;

        let wallet = Self::with_account(account, daemon_client, wallet_file, keys_file);

        let address_file = append_suffix(&wallet.wallet_file, ".address.txt");
        if let Err(e) = fs::write(&address_file, wallet.get_account_address_base58()) {
            log::warn!("String with address text not saved: {}", e);
        }

        wallet.store()?;
        Ok((wallet, recovery_seed))
    }

    /// Opens an existing wallet
    ///
    /// The keys file must exist and open under `password`; the snapshot file
    /// is optional — without it the wallet starts from genesis and a refresh
    /// rebuilds everything.
    ///
    /// # Errors
    /// `FileNotFound` without a keys file, `InvalidPassword` when it will
    /// not open, `MismatchedFiles` when the snapshot belongs to another
    /// account.
    pub fn load(
        wallet_path: impl AsRef<Path>,
        password: &str,
        daemon_client: TClient,
    ) -> Result<Self> {
        let wallet_file = wallet_path.as_ref().to_path_buf();
        let keys_file = append_suffix(&wallet_file, ".keys");

        if !keys_file.exists() {
            return Err(Error::FileNotFound(keys_file.display().to_string()));
        }

        let account = keys_file::load_keys_from_file(&keys_file, password)?;
        let mut wallet = Self::with_account(account, daemon_client, wallet_file, keys_file);
        log::info!(
            "Loaded wallet keys file, with public address: {}",
            wallet.get_account_address_base58()
        );

        if !wallet.wallet_file.exists() {
            log::info!(
                "file not found: {}, starting with empty blockchain",
                wallet.wallet_file.display()
            );
            return Ok(wallet);
        }

        let bytes = fs::read(&wallet.wallet_file)
            .map_err(|e| Error::FileReadError(format!("{}: {}", wallet.wallet_file.display(), e)))?;
        if let Some(snap) = snapshot::deserialize_snapshot(&bytes)? {
            if snap.account_public_address != wallet.account_public_address {
                return Err(Error::MismatchedFiles(format!(
                    "{}, {}",
                    wallet.wallet_file.display(),
                    wallet.keys_file.display()
                )));
            }
            wallet.blockchain = snap.blockchain;
            wallet.transfers = snap.transfers;
            wallet.key_images = snap.key_images;
            wallet.unconfirmed_txs = snap.unconfirmed_txs;
            wallet.payments = snap.payments;

            if wallet.blockchain.is_empty() {
                wallet.blockchain.push(Block::genesis().get_hash());
            }
        }

        Ok(wallet)
    }

    /// Writes the current state snapshot to the wallet file
    pub fn store(&self) -> Result<()> {
        let snapshot = snapshot::WalletSnapshot {
            blockchain: self.blockchain.clone(),
            transfers: self.transfers.clone(),
            account_public_address: self.account_public_address,
            key_images: self.key_images.clone(),
            unconfirmed_txs: self.unconfirmed_txs.clone(),
            payments: self.payments.clone(),
        };
        let bytes = snapshot::serialize_snapshot(&snapshot, snapshot::SNAPSHOT_VERSION)?;
        keys_file::write_atomically(&self.wallet_file, &bytes)
            .map_err(|e| Error::FileSaveError(format!("{}: {}", self.wallet_file.display(), e)))
    }

    /// Reports which of the two wallet files exist at `wallet_path`
    pub fn wallet_exists(wallet_path: impl AsRef<Path>) -> (bool, bool) {
        let wallet_file = wallet_path.as_ref();
        let keys_file = append_suffix(wallet_file, ".keys");
        (keys_file.exists(), wallet_file.exists())
    }

    /// Configures the transaction size ceiling enforced by the builder
    pub fn init(&mut self, upper_transaction_size_limit: u64) {
        self.upper_transaction_size_limit = upper_transaction_size_limit;
    }

    /// Asks a running scan loop to exit after its current pull
    pub fn stop(&self) {
        self.run.store(false, Ordering::Relaxed);
    }

    /// Installs the observation callbacks fired during scanning
    pub fn set_callbacks(&mut self, callbacks: WalletCallbacks) {
        self.callbacks = callbacks;
    }

    /// The account this wallet operates
    pub fn get_account(&self) -> &Account {
        &self.account
    }

    /// The account's public address
    pub fn get_account_address(&self) -> Address {
        self.account_public_address
    }

    /// The account's address in Base58 form
    pub fn get_account_address_base58(&self) -> String {
        self.account_public_address.to_address_string::<TCoin>()
    }

    /// The recovery seed, when the account is deterministic
    pub fn get_seed(&self) -> Option<SecretKey> {
        self.account.seed()
    }

    /// Total balance: unspent transfers plus change still in flight
    pub fn balance(&self) -> u64 {
        let confirmed: u64 = self
            .transfers
            .iter()
            .filter(|td| !td.spent)
            .map(TransferDetails::amount)
            .sum();
        let pending_change: u64 = self.unconfirmed_txs.values().map(|utx| utx.change).sum();
        confirmed + pending_change
    }

    /// Balance that is mature and unlocked enough to spend right now
    pub fn unlocked_balance(&self) -> u64 {
        self.transfers
            .iter()
            .filter(|td| !td.spent && self.is_transfer_unlocked(td))
            .map(TransferDetails::amount)
            .sum()
    }

    /// A copy of every transfer the wallet tracks
    pub fn get_transfers(&self) -> Vec<TransferDetails> {
        self.transfers.clone()
    }

    /// Payments recorded under `payment_id`, above `min_height`
    pub fn get_payments(&self, payment_id: &Hash256, min_height: u64) -> Vec<PaymentDetails> {
        self.payments
            .get(payment_id)
            .map(|payments| {
                payments
                    .iter()
                    .filter(|payment| min_height < payment.block_height)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Current local chain height (genesis included)
    pub fn get_blockchain_current_height(&self) -> u64 {
        self.blockchain.len() as u64
    }

    /// Number of key images in the spend-detection index
    pub fn key_image_count(&self) -> usize {
        self.key_images.len()
    }
}
