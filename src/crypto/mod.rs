//! Cryptographic primitives for PassVault.
//!
//! This module provides:
//! - PBKDF2-HMAC-SHA256 key derivation (`kdf`)
//! - AES-GCM encryption envelope encoded as base64 text (`encryption`)
//! - Configurable random password / salt generation (`generator`)

pub mod encryption;
pub mod generator;
pub mod kdf;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_key, ...};
pub use encryption::{decrypt, encrypt, SUPPORTED_KEY_LENGTHS};
pub use generator::{generate, GeneratorSettings};
pub use kdf::{derive_key, DEFAULT_KEY_LEN, PBKDF2_ITERATIONS};
