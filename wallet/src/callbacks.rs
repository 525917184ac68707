use common::{Block, Transaction};

/// Observation points fired synchronously from the scan task
///
/// All four closures default to no-ops and are invoked unconditionally, so
/// the scanner never has to test for their presence. Handlers must stay
/// short and must not re-enter the wallet.
pub struct WalletCallbacks {
    /// A block was appended to the local chain
    pub on_new_block: Box<dyn FnMut(u64, &Block) + Send>,
    /// An output addressed to this account was found at
    /// `(height, tx, out_index)`
    pub on_money_received: Box<dyn FnMut(u64, &Transaction, usize) + Send>,
    /// An owned output was seen being spent:
    /// `(height, owning_tx, out_index, spending_tx)`
    pub on_money_spent: Box<dyn FnMut(u64, &Transaction, usize, &Transaction) + Send>,
    /// A transaction without a usable public key was dropped
    pub on_skip_transaction: Box<dyn FnMut(u64, &Transaction) + Send>,
}

impl Default for WalletCallbacks {
    fn default() -> Self {
        WalletCallbacks {
            on_new_block: Box::new(|_, _| {}),
            on_money_received: Box::new(|_, _, _| {}),
            on_money_spent: Box::new(|_, _, _, _| {}),
            on_skip_transaction: Box::new(|_, _| {}),
        }
    }
}
