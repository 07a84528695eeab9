//! Per-invocation dependencies shared by the store-backed commands.

use tracing::debug;
use zeroize::Zeroizing;

use crate::backup::{BackupReport, BackupRotator};
use crate::config::Settings;
use crate::errors::{PassVaultError, Result};
use crate::vault::{self, Account, EncryptedSecret, Store};

use super::{env_secret, prompt_unlock_secret, Cli, SECRET_ENV};

/// Settings, store and backup rotator for one command run.
///
/// Built once in each command and passed down explicitly.
pub struct Context {
    pub settings: Settings,
    pub store: Store,
    pub rotator: BackupRotator,
}

impl Context {
    /// Resolve the storage directory, load settings, open the store.
    pub fn load(cli: &Cli) -> Result<Self> {
        let base_dir = cli
            .storage_path
            .clone()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(PassVaultError::MissingStoragePath)?;

        let settings = Settings::load(&base_dir)?;
        let policy = settings.backup_policy()?;
        let storage_path = Settings::storage_path(&base_dir);
        let store = Store::open(&storage_path)?;
        let rotator = BackupRotator::new(&storage_path, &base_dir, policy);

        debug!(path = %storage_path.display(), "store opened");

        Ok(Self {
            settings,
            store,
            rotator,
        })
    }

    /// Encrypt `plaintext` with the configured key length and salt shape.
    pub fn seal(&self, plaintext: &str, unlocking_secret: &str) -> Result<EncryptedSecret> {
        EncryptedSecret::seal(
            plaintext,
            unlocking_secret,
            self.settings.secret_key_length,
            &self.settings.salt,
        )
    }

    /// Decrypt the password of `account`, prompting for its secret.
    ///
    /// With `PASSVAULT_SECRET` set there is exactly one attempt.
    pub fn unlock_password(&self, account: &Account) -> Result<Zeroizing<String>> {
        let record = self.store.load_password(account.password_id)?;
        let key_len = self.settings.secret_key_length;

        let preset = env_secret(SECRET_ENV);
        let max_retries = if preset.is_some() {
            0
        } else {
            self.settings.unlock_max_retries
        };

        vault::unlock(
            max_retries,
            |attempt| prompt_unlock_secret(attempt, preset.as_ref()),
            |secret| record.open(secret, key_len),
        )
    }

    /// Persist a new account, then run `on_saved` alongside a backup
    /// cycle when this password lands on the backup interval.
    pub fn save_new_account(
        &mut self,
        service_name: &str,
        login: &str,
        sealed: &EncryptedSecret,
        on_saved: impl FnOnce(),
    ) -> Result<Option<BackupReport>> {
        let sequence_id = self
            .store
            .create_account_with_password(service_name, login, sealed)?;

        let ((), report) = self.rotator.after_create(sequence_id, on_saved);
        Ok(report)
    }
}
