//! Configuration: `passvault.toml` plus environment overrides.

pub mod settings;

pub use settings::{EnvRequirement, Settings, STORAGE_FILE_NAME, STORAGE_PATH_ENV};
