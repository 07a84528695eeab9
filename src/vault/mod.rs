//! Vault module: encrypted password records and their storage.
//!
//! This module provides:
//! - `EncryptedSecret` with seal / open (`secret`)
//! - The bounded unlock retry loop (`unlock`)
//! - Service / account records (`record`)
//! - The SQLite-backed `Store` (`store`)

pub mod record;
pub mod secret;
pub mod store;
pub mod unlock;

// Re-export the most commonly used items.
pub use record::{Account, Service, ServiceSummary};
pub use secret::EncryptedSecret;
pub use store::Store;
pub use unlock::{unlock, DEFAULT_MAX_RETRIES};
