//! The encrypted password record and the seal / open operations on it.
//!
//! An `EncryptedSecret` is always an (envelope, salt) pair.  Both fields
//! are text: the envelope is base64 and the salt is a generated random
//! string used as raw bytes for key derivation.  Re-encryption builds a
//! whole new pair; the old one is never patched field by field.

use std::fmt;

use zeroize::Zeroizing;

use crate::crypto::{decrypt, derive_key, encrypt, generate, GeneratorSettings};
use crate::errors::Result;

/// Ciphertext plus the salt its key was derived with.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptedSecret {
    /// Base64 envelope (nonce || ciphertext || tag).
    pub encrypted: String,
    /// Per-record salt for key derivation.
    pub salt: String,
}

impl fmt::Debug for EncryptedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptedSecret")
            .field("encrypted", &"[REDACTED]")
            .field("salt", &"[REDACTED]")
            .finish()
    }
}

impl EncryptedSecret {
    /// Encrypt `plaintext` under `unlocking_secret` with a freshly
    /// generated salt.
    pub fn seal(
        plaintext: &str,
        unlocking_secret: &str,
        key_len: usize,
        salt_settings: &GeneratorSettings,
    ) -> Result<Self> {
        let salt = generate(salt_settings)?;
        let key = derive_key(unlocking_secret.as_bytes(), salt.as_bytes(), key_len)?;
        let encrypted = encrypt(&key, plaintext)?;

        Ok(Self {
            encrypted,
            salt: salt.to_string(),
        })
    }

    /// Decrypt with `unlocking_secret`, re-deriving the key from the
    /// stored salt.
    pub fn open(&self, unlocking_secret: &str, key_len: usize) -> Result<Zeroizing<String>> {
        let key = derive_key(unlocking_secret.as_bytes(), self.salt.as_bytes(), key_len)?;
        decrypt(&key, &self.encrypted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PassVaultError;

    fn salt_settings() -> GeneratorSettings {
        GeneratorSettings::salt_default()
    }

    #[test]
    fn seal_then_open() {
        let sealed = EncryptedSecret::seal("hunter2", "my secret", 32, &salt_settings()).unwrap();
        assert_eq!(sealed.open("my secret", 32).unwrap().as_str(), "hunter2");
    }

    #[test]
    fn wrong_secret_fails() {
        let sealed = EncryptedSecret::seal("hunter2", "right", 32, &salt_settings()).unwrap();
        assert!(matches!(
            sealed.open("wrong", 32),
            Err(PassVaultError::DecryptionFailed)
        ));
    }

    #[test]
    fn each_seal_uses_a_new_salt() {
        let a = EncryptedSecret::seal("pw", "s", 32, &salt_settings()).unwrap();
        let b = EncryptedSecret::seal("pw", "s", 32, &salt_settings()).unwrap();
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.encrypted, b.encrypted);
    }

    #[test]
    fn debug_hides_fields() {
        let sealed = EncryptedSecret::seal("pw", "s", 32, &salt_settings()).unwrap();
        let shown = format!("{sealed:?}");
        assert!(!shown.contains(&sealed.salt));
        assert!(shown.contains("REDACTED"));
    }
}
