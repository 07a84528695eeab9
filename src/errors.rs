use thiserror::Error;

/// All errors that can occur in PassVault.
#[derive(Debug, Error)]
pub enum PassVaultError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: wrong secret or corrupted data")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Unable to unlock after {attempts} attempts: {source}")]
    UnlockExhausted {
        attempts: u32,
        #[source]
        source: Box<PassVaultError>,
    },

    // --- Store errors ---
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Service '{0}' not found")]
    ServiceNotFound(String),

    #[error("Account with login '{login}' not found at '{service}'")]
    AccountNotFound { service: String, login: String },

    #[error("Account with login '{login}' at '{service}' already exists (use `set` to update it)")]
    AccountAlreadyExists { service: String, login: String },

    // --- Config errors ---
    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Storage path is not configured; set PASSVAULT_STORAGE_PATH or pass --storage-path")]
    MissingStoragePath,

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("The password must be at least {min} and no more than {max} characters long")]
    InvalidPasswordLength { min: usize, max: usize },
}

impl From<rusqlite::Error> for PassVaultError {
    fn from(e: rusqlite::Error) -> Self {
        PassVaultError::Storage(e.to_string())
    }
}

/// Convenience type alias for PassVault results.
pub type Result<T> = std::result::Result<T, PassVaultError>;
