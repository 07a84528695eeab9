//! Backup filename template and rotation policy.

use std::num::NonZeroU64;
use std::path::Path;

use glob::Pattern;

use crate::errors::{PassVaultError, Result};

/// Placeholder replaced by the Unix timestamp in backup file names.
pub const TIMESTAMP_PLACEHOLDER: &str = "{timestamp}";

/// A parsed backup filename template such as `{timestamp}.passvault_backup.db`.
///
/// The literal text around the placeholder is kept apart so that file
/// names and the prune glob are built from the same source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupTemplate {
    prefix: String,
    suffix: String,
}

impl BackupTemplate {
    /// Parse and validate a template string.
    ///
    /// The template must contain exactly one `{timestamp}`, some literal
    /// text, and no path separators.
    pub fn parse(template: &str) -> Result<Self> {
        let occurrences = template.matches(TIMESTAMP_PLACEHOLDER).count();
        if occurrences != 1 {
            return Err(PassVaultError::ConfigError(format!(
                "backup filename template '{template}' must contain {TIMESTAMP_PLACEHOLDER} exactly once"
            )));
        }

        if template.contains('/') || template.contains('\\') {
            return Err(PassVaultError::ConfigError(format!(
                "backup filename template '{template}' must be a file name, not a path"
            )));
        }

        let (prefix, suffix) = template
            .split_once(TIMESTAMP_PLACEHOLDER)
            .unwrap_or((template, ""));

        if prefix.is_empty() && suffix.is_empty() {
            return Err(PassVaultError::ConfigError(
                "backup filename template needs literal text besides the timestamp".into(),
            ));
        }

        Ok(Self {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        })
    }

    /// File name of the backup taken at `timestamp`.
    pub fn file_name(&self, timestamp: i64) -> String {
        format!("{}{timestamp}{}", self.prefix, self.suffix)
    }

    /// File-name glob with the timestamp segment replaced by `*`.
    pub fn name_pattern(&self) -> String {
        format!(
            "{}*{}",
            Pattern::escape(&self.prefix),
            Pattern::escape(&self.suffix)
        )
    }

    /// Full glob matching every backup inside `dir`.
    pub fn glob_pattern(&self, dir: &Path) -> String {
        let escaped_dir = Pattern::escape(&dir.to_string_lossy());
        Path::new(&escaped_dir)
            .join(self.name_pattern())
            .to_string_lossy()
            .into_owned()
    }

    /// Returns `true` if `file_name` would be picked up by pruning.
    pub fn matches(&self, file_name: &str) -> bool {
        Pattern::new(&self.name_pattern()).is_ok_and(|p| p.matches(file_name))
    }
}

/// How often backups are taken and how many are kept.
///
/// Built from validated settings; the interval type rules out a
/// division by zero when the trigger is evaluated.
#[derive(Debug, Clone)]
pub struct BackupPolicy {
    /// Back up on every Nth created password.
    pub interval: NonZeroU64,
    /// Number of newest backups to keep.
    pub keep: usize,
    pub template: BackupTemplate,
}
