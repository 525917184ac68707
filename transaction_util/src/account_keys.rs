use serde::{Deserialize, Serialize};

use crypto::{CNFastHash, KeyPair, ScalarExt, SecretKey};

use crate::address::Address;

/// A combination of a view and spend keypair which is used to create and
/// recognize transactions
#[derive(Clone, Serialize, Deserialize)]
pub struct AccountKeys {
    /// Spend keypair
    pub spend_keypair: KeyPair,
    /// View keypair
    pub view_keypair: KeyPair,
}

/// Deterministic keypair generation
///
/// The view secret key is derived by taking the Keccak (non-standard) hash of
/// the spend secret key, reduced modulo the curve order. Only the spend
/// secret needs to be backed up
impl From<SecretKey> for AccountKeys {
    fn from(spend_secret_key: SecretKey) -> AccountKeys {
        let view_secret_key =
            SecretKey::from_slice(&CNFastHash::digest(spend_secret_key.as_bytes()));

        AccountKeys {
            spend_keypair: KeyPair::from(spend_secret_key),
            view_keypair: KeyPair::from(view_secret_key),
        }
    }
}

impl AccountKeys {
    /// Builds an account from independent view and spend secrets
    pub fn from_non_deterministic_keys(
        spend_secret_key: SecretKey,
        view_secret_key: SecretKey,
    ) -> AccountKeys {
        AccountKeys {
            spend_keypair: KeyPair::from(spend_secret_key),
            view_keypair: KeyPair::from(view_secret_key),
        }
    }

    /// The public address of this account
    pub fn address(&self) -> Address {
        Address::standard(self.spend_keypair.public_key, self.view_keypair.public_key)
    }

    /// Whether the view secret is the deterministic derivation of the spend
    /// secret, i.e. whether the spend secret alone can recover this account
    pub fn is_deterministic(&self) -> bool {
        let derived =
            SecretKey::from_slice(&CNFastHash::digest(self.spend_keypair.secret_key.as_bytes()));
        derived == self.view_keypair.secret_key
    }
}
