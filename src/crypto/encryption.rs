//! AES-GCM authenticated encryption envelope.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce and
//! prepends it to the ciphertext.  The whole blob is base64-encoded so
//! it can be stored as a text column next to its salt.
//!
//! Layout before encoding:
//!   [ 12-byte nonce | ciphertext + 16-byte auth tag ]
//!
//! The key length selects the cipher: 16 bytes for AES-128-GCM,
//! 32 bytes for AES-256-GCM.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, Nonce, OsRng};
use aes_gcm::{Aes128Gcm, Aes256Gcm};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use zeroize::{Zeroize, Zeroizing};

use crate::errors::{PassVaultError, Result};

/// Size of the AES-GCM nonce in bytes.
const NONCE_LEN: usize = 12;

/// Key lengths accepted by the envelope.
pub const SUPPORTED_KEY_LENGTHS: [usize; 2] = [16, 32];

/// Encrypt `plaintext` and return the base64 envelope.
pub fn encrypt(key: &[u8], plaintext: &str) -> Result<String> {
    let sealed = match key.len() {
        16 => seal::<Aes128Gcm>(key, plaintext.as_bytes())?,
        32 => seal::<Aes256Gcm>(key, plaintext.as_bytes())?,
        n => {
            return Err(PassVaultError::EncryptionFailed(format!(
                "unsupported key length {n}"
            )))
        }
    };
    Ok(BASE64.encode(sealed))
}

/// Decrypt an envelope produced by `encrypt`.
///
/// Malformed encoding, a blob shorter than a nonce, a failed auth tag
/// (wrong key or tampering) and non-UTF-8 plaintext all map to
/// `DecryptionFailed`.
pub fn decrypt(key: &[u8], envelope: &str) -> Result<Zeroizing<String>> {
    let raw = BASE64
        .decode(envelope.trim())
        .map_err(|_| PassVaultError::DecryptionFailed)?;

    if raw.len() < NONCE_LEN {
        return Err(PassVaultError::DecryptionFailed);
    }

    let plaintext = match key.len() {
        16 => open::<Aes128Gcm>(key, &raw)?,
        32 => open::<Aes256Gcm>(key, &raw)?,
        _ => return Err(PassVaultError::DecryptionFailed),
    };

    // On error, zeroize the bytes inside the error before discarding.
    String::from_utf8(plaintext)
        .map(Zeroizing::new)
        .map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            PassVaultError::DecryptionFailed
        })
}

fn seal<C>(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>>
where
    C: Aead + AeadCore + KeyInit,
{
    let cipher = C::new_from_slice(key)
        .map_err(|e| PassVaultError::EncryptionFailed(format!("invalid key: {e}")))?;

    let nonce = C::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| PassVaultError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut output = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    output.extend_from_slice(&nonce);
    output.extend_from_slice(&ciphertext);
    Ok(output)
}

fn open<C>(key: &[u8], raw: &[u8]) -> Result<Vec<u8>>
where
    C: Aead + AeadCore + KeyInit,
{
    let (nonce_bytes, ciphertext) = raw.split_at(NONCE_LEN);
    let nonce = Nonce::<C>::from_slice(nonce_bytes);

    let cipher = C::new_from_slice(key).map_err(|_| PassVaultError::DecryptionFailed)?;

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| PassVaultError::DecryptionFailed)
}
