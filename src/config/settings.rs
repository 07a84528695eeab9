use std::num::NonZeroU64;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::backup::{BackupPolicy, BackupTemplate};
use crate::crypto::generator::GeneratorSettings;
use crate::crypto::SUPPORTED_KEY_LENGTHS;
use crate::errors::{PassVaultError, Result};

/// Environment variable holding the storage directory (required).
pub const STORAGE_PATH_ENV: &str = "PASSVAULT_STORAGE_PATH";
/// Back up on every Nth created password.
pub const BACKUP_INTERVAL_ENV: &str = "PASSVAULT_BACKUP_INTERVAL";
/// Number of backups to keep.
pub const BACKUP_COUNT_ENV: &str = "PASSVAULT_BACKUP_COUNT";
/// Length of generated passwords.
pub const DEFAULT_PASSWORD_LENGTH_ENV: &str = "PASSVAULT_DEFAULT_PASSWORD_LENGTH";

/// Name of the live store inside the storage directory.
pub const STORAGE_FILE_NAME: &str = "passvault_storage.db";

/// A configuration input the user can provide through the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvRequirement {
    pub name: &'static str,
    pub description: String,
    pub required: bool,
}

/// Vault configuration, loaded from `<storage dir>/passvault.toml`.
///
/// Every field has a sensible default so PassVault works out-of-the-box
/// without any config file at all.  A few fields can also be overridden
/// through environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Derived key length in bytes (16 or 32).
    #[serde(default = "default_secret_key_length")]
    pub secret_key_length: usize,

    /// Back up on every Nth created password.
    #[serde(default = "default_backup_interval")]
    pub backup_interval: u64,

    /// How many backups to keep.
    #[serde(default = "default_backup_count")]
    pub backup_count: usize,

    /// Backup file name; `{timestamp}` is replaced by Unix seconds.
    #[serde(default = "default_backup_filename_template")]
    pub backup_filename_template: String,

    /// Retries allowed after the first wrong unlocking secret.
    #[serde(default = "default_unlock_max_retries")]
    pub unlock_max_retries: u32,

    /// Bounds for user-requested generated password lengths.
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,

    #[serde(default = "default_max_password_length")]
    pub max_password_length: usize,

    /// Shape of generated account passwords.
    #[serde(default = "GeneratorSettings::password_default")]
    pub password: GeneratorSettings,

    /// Shape of per-record salts.
    #[serde(default = "GeneratorSettings::salt_default")]
    pub salt: GeneratorSettings,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_secret_key_length() -> usize {
    crate::crypto::DEFAULT_KEY_LEN
}

fn default_backup_interval() -> u64 {
    5
}

fn default_backup_count() -> usize {
    5
}

fn default_backup_filename_template() -> String {
    "{timestamp}.passvault_backup.db".to_string()
}

fn default_unlock_max_retries() -> u32 {
    crate::vault::DEFAULT_MAX_RETRIES
}

fn default_min_password_length() -> usize {
    6
}

fn default_max_password_length() -> usize {
    100
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            secret_key_length: default_secret_key_length(),
            backup_interval: default_backup_interval(),
            backup_count: default_backup_count(),
            backup_filename_template: default_backup_filename_template(),
            unlock_max_retries: default_unlock_max_retries(),
            min_password_length: default_min_password_length(),
            max_password_length: default_max_password_length(),
            password: GeneratorSettings::password_default(),
            salt: GeneratorSettings::salt_default(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the storage directory.
    pub const FILE_NAME: &'static str = "passvault.toml";

    /// Load, apply environment overrides, and validate.
    ///
    /// If the config file does not exist, defaults are used.  Invalid
    /// values are reported as `ConfigError` before any command runs.
    pub fn load(base_dir: &Path) -> Result<Self> {
        let mut settings = Self::load_file(base_dir)?;
        settings.apply_env_overrides(|name| std::env::var(name).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read `<base_dir>/passvault.toml`, or defaults when it is absent.
    pub fn load_file(base_dir: &Path) -> Result<Self> {
        let config_path = base_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        toml::from_str(&contents).map_err(|e| {
            PassVaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })
    }

    /// Override fields from environment variables.
    ///
    /// `lookup` abstracts `std::env::var` so tests don't touch the
    /// process environment.  Empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(v) = read(BACKUP_INTERVAL_ENV) {
            self.backup_interval = parse_env_number(BACKUP_INTERVAL_ENV, &v)?;
        }
        if let Some(v) = read(BACKUP_COUNT_ENV) {
            self.backup_count = parse_env_number(BACKUP_COUNT_ENV, &v)?;
        }
        if let Some(v) = read(DEFAULT_PASSWORD_LENGTH_ENV) {
            self.password.length = parse_env_number(DEFAULT_PASSWORD_LENGTH_ENV, &v)?;
        }

        Ok(())
    }

    /// Check every setting that would otherwise fail at use time.
    pub fn validate(&self) -> Result<()> {
        if !SUPPORTED_KEY_LENGTHS.contains(&self.secret_key_length) {
            return Err(PassVaultError::ConfigError(format!(
                "secret_key_length must be one of {SUPPORTED_KEY_LENGTHS:?} (got {})",
                self.secret_key_length
            )));
        }

        self.backup_policy()?;

        self.salt
            .validate()
            .map_err(|e| PassVaultError::ConfigError(format!("salt settings: {e}")))?;
        self.password
            .validate()
            .map_err(|e| PassVaultError::ConfigError(format!("password settings: {e}")))?;

        if self.min_password_length > self.max_password_length {
            return Err(PassVaultError::ConfigError(format!(
                "min_password_length ({}) exceeds max_password_length ({})",
                self.min_password_length, self.max_password_length
            )));
        }
        self.check_password_length(self.password.length)?;

        Ok(())
    }

    /// Build the backup policy (interval, retention, file template).
    pub fn backup_policy(&self) -> Result<BackupPolicy> {
        let interval = NonZeroU64::new(self.backup_interval).ok_or_else(|| {
            PassVaultError::ConfigError("backup_interval must be greater than zero".into())
        })?;

        let template = BackupTemplate::parse(&self.backup_filename_template)?;
        if template.matches(STORAGE_FILE_NAME) {
            return Err(PassVaultError::ConfigError(format!(
                "backup filename template '{}' would match the live store",
                self.backup_filename_template
            )));
        }

        Ok(BackupPolicy {
            interval,
            keep: self.backup_count,
            template,
        })
    }

    /// Reject generated password lengths outside the configured bounds.
    pub fn check_password_length(&self, length: usize) -> Result<()> {
        if length < self.min_password_length || length > self.max_password_length {
            return Err(PassVaultError::InvalidPasswordLength {
                min: self.min_password_length,
                max: self.max_password_length,
            });
        }
        Ok(())
    }

    /// Full path of the live store inside `base_dir`.
    pub fn storage_path(base_dir: &Path) -> PathBuf {
        base_dir.join(STORAGE_FILE_NAME)
    }

    /// Environment variables the tool understands, for `requirements`.
    pub fn requirements() -> Vec<EnvRequirement> {
        vec![
            EnvRequirement {
                name: STORAGE_PATH_ENV,
                description: "Path to a directory where your encrypted data will be stored, e.g. /Users/me/passvault".into(),
                required: true,
            },
            EnvRequirement {
                name: BACKUP_INTERVAL_ENV,
                description: format!(
                    "Back up the store on every Nth added password, by default {}",
                    default_backup_interval()
                ),
                required: false,
            },
            EnvRequirement {
                name: BACKUP_COUNT_ENV,
                description: format!(
                    "Count of backups to keep, by default {}",
                    default_backup_count()
                ),
                required: false,
            },
            EnvRequirement {
                name: DEFAULT_PASSWORD_LENGTH_ENV,
                description: format!(
                    "Length of generated passwords, by default {}",
                    GeneratorSettings::password_default().length
                ),
                required: false,
            },
        ]
    }
}

fn parse_env_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        PassVaultError::ConfigError(format!(
            "can't convert {name}='{value}' to a non-negative integer"
        ))
    })
}

// ── Tests ────────────────────────────────────────────────────────────
