use std::time::{SystemTime, UNIX_EPOCH};

use monero_seed::{Language, Seed};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crypto::{ecc::Scalar, KeyPair, SecretKey};
use transaction_util::AccountKeys;

use crate::WalletParams;

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// The data the keys file protects: the account keypairs and when the
/// account came into existence
///
/// The creation timestamp lets the scanner skip blocks that predate the
/// account (see the scan-skip heuristic in the chain scanner).
#[derive(Clone, Serialize, Deserialize)]
pub struct Account {
    /// Spend and view keypairs
    pub keys: AccountKeys,
    /// Account creation time in Unix seconds
    pub creation_timestamp: u64,
}

impl Account {
    /// Creates an account with independently random spend and view keys
    ///
    /// Such an account cannot be restored from a single seed; both secrets
    /// must be backed up
    pub fn create_unrecoverable() -> Account {
        Account {
            keys: AccountKeys::from_non_deterministic_keys(
                KeyPair::generate().secret_key,
                KeyPair::generate().secret_key,
            ),
            creation_timestamp: current_timestamp(),
        }
    }

    /// Creates an account whose view key is derived from the spend key
    ///
    /// Returns the account along with the spend secret, which doubles as the
    /// recovery seed: both keypairs can be restored from it alone
    pub fn create_recoverable() -> (Account, SecretKey) {
        let spend_secret_key = KeyPair::generate().secret_key;
        let account = Account {
            keys: AccountKeys::from(spend_secret_key),
            creation_timestamp: current_timestamp(),
        };
        (account, spend_secret_key)
    }

    /// Restores a recoverable account from its seed
    ///
    /// The creation timestamp is pinned to the network's earliest-account
    /// epoch so that a restored wallet rescans the whole chain
    pub fn recover<TCoin: WalletParams>(seed: SecretKey) -> Account {
        Account {
            keys: AccountKeys::from(seed),
            creation_timestamp: TCoin::EARLIEST_ACCOUNT_TIMESTAMP,
        }
    }

    /// The recovery seed, if this account is deterministic
    pub fn seed(&self) -> Option<SecretKey> {
        if self.keys.is_deterministic() {
            Some(self.keys.spend_keypair.secret_key)
        } else {
            None
        }
    }
}

/// Renders a recovery seed as its 25-word mnemonic form
pub fn seed_to_words(seed: &SecretKey) -> Option<Zeroizing<String>> {
    Seed::from_entropy(Language::English, Zeroizing::new(seed.to_bytes()))
        .map(|seed| seed.to_string())
}

/// Parses a 25-word mnemonic back into a recovery seed
pub fn words_to_seed(words: &str) -> Option<SecretKey> {
    let seed = Seed::from_string(Language::English, Zeroizing::new(words.to_string())).ok()?;
    Some(Scalar::from_bytes_mod_order(*seed.entropy()))
}
