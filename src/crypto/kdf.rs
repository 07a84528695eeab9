//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! Every stored password carries its own random salt, so the same
//! unlocking secret yields a different key for each record.  Decryption
//! re-derives the key from the secret and the stored salt.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use tracing::debug;
use zeroize::Zeroizing;

use crate::errors::{PassVaultError, Result};

/// Fixed PBKDF2 iteration count.  Changing it breaks every stored record.
pub const PBKDF2_ITERATIONS: u32 = 10_000;

/// Default derived key length in bytes (AES-256).
pub const DEFAULT_KEY_LEN: usize = 32;

/// Derive a `key_len`-byte key from `secret` and `salt`.
///
/// The same secret + salt + length always produce the same key.
/// A zero `key_len` or an empty `salt` is rejected.
pub fn derive_key(secret: &[u8], salt: &[u8], key_len: usize) -> Result<Zeroizing<Vec<u8>>> {
    if key_len == 0 {
        return Err(PassVaultError::KeyDerivationFailed(
            "key length must be greater than zero".into(),
        ));
    }
    if salt.is_empty() {
        return Err(PassVaultError::KeyDerivationFailed(
            "salt must not be empty".into(),
        ));
    }

    let mut key = Zeroizing::new(vec![0u8; key_len]);
    pbkdf2_hmac::<Sha256>(secret, salt, PBKDF2_ITERATIONS, &mut key);
    debug!(key_len, salt_len = salt.len(), "derived key");

    Ok(key)
}
