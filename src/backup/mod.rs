//! Backup module: rotating copies of the storage file.
//!
//! This module provides:
//! - The pure `should_backup` decision (`trigger`)
//! - Filename template and retention policy (`policy`)
//! - Concurrent create + prune cycle (`rotator`)

pub mod policy;
pub mod rotator;
pub mod trigger;

pub use policy::{BackupPolicy, BackupTemplate};
pub use rotator::{BackupError, BackupFile, BackupReport, BackupRotator, PruneOutcome};
pub use trigger::should_backup;
