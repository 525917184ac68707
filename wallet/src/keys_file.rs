//! The encrypted keys file
//!
//! `<wallet>.keys` holds `{ iv, ciphertext }` where the ciphertext is the
//! ChaCha8 encryption of the serialized account under a password-derived
//! key. There is no authentication tag: a wrong password and a corrupted
//! file both surface as `InvalidPassword`, which is deliberate — the two are
//! indistinguishable to users and to side-channel observers.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crypto::{chacha, KeyPair};

use crate::account::Account;
use crate::error::{Error, Result};

#[derive(Serialize, Deserialize)]
struct KeysFileData {
    iv: chacha::ChaChaIV,
    account_data: Vec<u8>,
}

fn verify_keys(keypair: &KeyPair) -> bool {
    KeyPair::from(keypair.secret_key).public_key == keypair.public_key
}

/// Atomically writes a file by staging to a sibling and renaming over the
/// target, so a crash never leaves a half-written keys file behind
pub(crate) fn write_atomically(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = Path::new(&staging);

    fs::write(staging, contents)?;
    fs::rename(staging, path)
}

/// Encrypts `account` under `password` and writes it to `keys_file_name`
pub fn store_keys_to_file(keys_file_name: &Path, password: &str, account: &Account) -> Result<()> {
    let account_data =
        bincode::serialize(account).map_err(|e| Error::KeysSerializeError(e.to_string()))?;

    let key = chacha::generate_key(password.as_bytes());
    let iv = chacha::generate_iv();

    let mut cipher = account_data;
    chacha::apply(&key, &iv, &mut cipher);

    let file_data = KeysFileData {
        iv,
        account_data: cipher,
    };
    let buf =
        bincode::serialize(&file_data).map_err(|e| Error::KeysSerializeError(e.to_string()))?;

    write_atomically(keys_file_name, &buf)
        .map_err(|e| Error::FileSaveError(format!("{}: {}", keys_file_name.display(), e)))
}

/// Reads and decrypts the keys file, verifying that the stored public keys
/// really correspond to the decrypted secrets
///
/// # Errors
/// `InvalidPassword` when decryption produces anything other than a
/// self-consistent account — wrong password and corruption are one error.
pub fn load_keys_from_file(keys_file_name: &Path, password: &str) -> Result<Account> {
    let buf = fs::read(keys_file_name)
        .map_err(|e| Error::FileReadError(format!("{}: {}", keys_file_name.display(), e)))?;

    let file_data: KeysFileData =
        bincode::deserialize(&buf).map_err(|e| Error::KeysDeserializeError(e.to_string()))?;

    let key = chacha::generate_key(password.as_bytes());
    let mut account_data = file_data.account_data;
    chacha::apply(&key, &file_data.iv, &mut account_data);

    let account: Account =
        bincode::deserialize(&account_data).map_err(|_| Error::InvalidPassword)?;

    if !verify_keys(&account.keys.view_keypair) || !verify_keys(&account.keys.spend_keypair) {
        return Err(Error::InvalidPassword);
    }

    Ok(account)
}
