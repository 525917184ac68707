use thiserror::Error;

/// Type alias for wallet operations that may fail
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong inside the wallet core
///
/// Only `TxTooBig` is ever caught internally (by the split-and-retry loop in
/// `create_transactions`); every other kind propagates to the caller.
/// `InternalError` marks a broken invariant and is never retried.
#[derive(Error, Debug)]
pub enum Error {
    /// A wallet or keys file is already present at the target path
    #[error("File already exists: {0}")]
    FileExists(String),

    /// The keys file is missing
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// A wallet file could not be read or decoded
    #[error("Couldn't read file: {0}")]
    FileReadError(String),

    /// A wallet file could not be written
    #[error("Couldn't save file: {0}")]
    FileSaveError(String),

    /// The wallet snapshot belongs to a different account than the keys file
    #[error("Wallet file doesn't match keys file: {0}")]
    MismatchedFiles(String),

    /// The password failed to open the keys file. Wrong password and a
    /// corrupted file are deliberately indistinguishable
    #[error("Invalid password")]
    InvalidPassword,

    /// The account could not be serialized for the keys file
    #[error("Couldn't serialize keys: {0}")]
    KeysSerializeError(String),

    /// The keys file container could not be decoded
    #[error("Couldn't deserialize keys file: {0}")]
    KeysDeserializeError(String),

    /// A block blob from the daemon failed to parse
    #[error("Couldn't parse block")]
    BlockParseError,

    /// A transaction blob from the daemon failed to parse
    #[error("Couldn't parse transaction")]
    TxParseError,

    /// The daemon could not be reached
    #[error("No connection to daemon: {0}")]
    NoConnectionToDaemon(String),

    /// The daemon reported it is busy
    #[error("Daemon is busy: {0}")]
    DaemonBusy(String),

    /// The daemon reported a failure
    #[error("Daemon error: {0}")]
    DaemonError(String),

    /// The daemon failed a chain pull
    #[error("Daemon error fetching blocks: {0}")]
    GetBlocksError(String),

    /// The daemon failed a decoy sampling request
    #[error("Failed to get random outputs to mix: {0}")]
    GetRandomOutsError(String),

    /// The daemon refused to relay a transaction
    #[error("Transaction rejected: {0}")]
    TxRejected(String),

    /// A destination (or the whole destination list) is zero
    #[error("One of the destinations is zero")]
    ZeroDestination,

    /// Summing the required money overflowed
    #[error("Transaction sum overflow")]
    TxSumOverflow,

    /// Spendable outputs cannot cover the requested amount plus fee
    #[error("Not enough money: {0}")]
    NotEnoughMoney(String),

    /// The daemon returned fewer decoys than the requested mixin count
    #[error("Not enough outputs for specified mixin count")]
    NotEnoughOutsToMix,

    /// Transaction construction failed
    #[error("Transaction not constructed: {0}")]
    TxNotConstructed(String),

    /// The built transaction exceeds the configured size limit
    #[error("Transaction too big")]
    TxTooBig,

    /// A built transaction carries an input that is not a key spend
    #[error("Unexpected transaction input type")]
    UnexpectedTxinType,

    /// A wallet invariant was broken
    #[error("Internal wallet error: {0}")]
    InternalError(String),
}

impl From<node_rpc::Error> for Error {
    fn from(error: node_rpc::Error) -> Self {
        Error::NoConnectionToDaemon(error.to_string())
    }
}
