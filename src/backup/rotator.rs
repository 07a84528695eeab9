//! Backup rotation: copy the live store, prune old copies.
//!
//! A rotation cycle runs two independent tasks on scoped threads:
//! `create_backup` and `prune_backups`.  The caller's own work runs on
//! the current thread in between, and both tasks are joined before
//! `run_cycle` returns, so no backup work outlives the command.
//!
//! Pruning lists the backup directory while the new copy may still be
//! in flight.  A copy created in the same cycle may therefore survive
//! one extra cycle; the tasks are not sequenced.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::policy::BackupPolicy;
use super::trigger::should_backup;

/// A non-fatal failure of one backup task.
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("unable to create backup {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to clear backups: {0}")]
    Prune(String),

    #[error("backup task '{0}' panicked")]
    TaskPanicked(&'static str),
}

/// A backup file found on disk during pruning.
#[derive(Debug, Clone)]
pub struct BackupFile {
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// What pruning did.
#[derive(Debug, Default)]
pub struct PruneOutcome {
    /// Backups that were deleted.
    pub removed: Vec<PathBuf>,
    /// Backups that should have been deleted but could not be.
    pub failed: Vec<PathBuf>,
}

/// Combined result of one rotation cycle.
#[derive(Debug, Default)]
pub struct BackupReport {
    pub created: Option<PathBuf>,
    pub pruned: PruneOutcome,
    pub errors: Vec<BackupError>,
}

impl BackupReport {
    /// `true` when both tasks finished and every delete succeeded.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.pruned.failed.is_empty()
    }
}

/// Copies the store file and prunes old backups according to a policy.
#[derive(Debug, Clone)]
pub struct BackupRotator {
    storage_path: PathBuf,
    backup_dir: PathBuf,
    policy: BackupPolicy,
}

impl BackupRotator {
    pub fn new(storage_path: &Path, backup_dir: &Path, policy: BackupPolicy) -> Self {
        Self {
            storage_path: storage_path.to_path_buf(),
            backup_dir: backup_dir.to_path_buf(),
            policy,
        }
    }

    /// Copy the store byte-for-byte to a new timestamped backup file.
    pub fn create_backup(&self) -> Result<PathBuf, BackupError> {
        info!("creating backup");
        let name = self.policy.template.file_name(Utc::now().timestamp());
        let destination = self.backup_dir.join(name);

        fs::copy(&self.storage_path, &destination).map_err(|source| BackupError::Create {
            path: destination.clone(),
            source,
        })?;

        debug!(path = %destination.display(), "backup created");
        Ok(destination)
    }

    /// Delete every backup beyond the `keep` newest ones.
    ///
    /// Backups are ranked by modification time, newest first.  A file
    /// that cannot be deleted is logged and skipped; the rest are still
    /// processed.
    pub fn prune_backups(&self) -> Result<PruneOutcome, BackupError> {
        let files = self.list_backups()?;
        let keep = self.policy.keep;

        if files.len() <= keep {
            return Ok(PruneOutcome::default());
        }

        info!(found = files.len(), keep, "clearing unnecessary backups");

        let mut outcome = PruneOutcome::default();
        for file in files.into_iter().skip(keep) {
            match fs::remove_file(&file.path) {
                Ok(()) => outcome.removed.push(file.path),
                Err(e) => {
                    warn!(path = %file.path.display(), error = %e, "unable to remove backup file");
                    outcome.failed.push(file.path);
                }
            }
        }

        Ok(outcome)
    }

    /// All backups currently on disk, newest first.
    pub fn list_backups(&self) -> Result<Vec<BackupFile>, BackupError> {
        let pattern = self.policy.template.glob_pattern(&self.backup_dir);
        let entries = glob::glob(&pattern).map_err(|e| BackupError::Prune(e.to_string()))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable backup entry");
                    continue;
                }
            };

            let modified = fs::metadata(&path)
                .and_then(|meta| meta.modified())
                .map_err(|e| BackupError::Prune(format!("{}: {e}", path.display())))?;

            files.push(BackupFile { path, modified });
        }

        files.sort_by(|a, b| {
            b.modified
                .cmp(&a.modified)
                .then_with(|| b.path.cmp(&a.path))
        });
        Ok(files)
    }

    /// Run one rotation cycle alongside `work`.
    ///
    /// Both tasks start before `work` is called and are joined after it
    /// returns.  Task failures land in the report and never affect the
    /// value produced by `work`.
    pub fn run_cycle<R>(&self, work: impl FnOnce() -> R) -> (R, BackupReport) {
        std::thread::scope(|scope| {
            let create = scope.spawn(|| self.create_backup());
            let prune = scope.spawn(|| self.prune_backups());

            let value = work();

            let mut report = BackupReport::default();
            match create.join() {
                Ok(Ok(path)) => report.created = Some(path),
                Ok(Err(e)) => report.errors.push(e),
                Err(_) => report.errors.push(BackupError::TaskPanicked("create")),
            }
            match prune.join() {
                Ok(Ok(outcome)) => report.pruned = outcome,
                Ok(Err(e)) => report.errors.push(e),
                Err(_) => report.errors.push(BackupError::TaskPanicked("prune")),
            }

            (value, report)
        })
    }

    /// Run `work`, with a rotation cycle alongside it when
    /// `sequence_id` hits the configured interval.
    pub fn after_create<R>(
        &self,
        sequence_id: u64,
        work: impl FnOnce() -> R,
    ) -> (R, Option<BackupReport>) {
        if should_backup(sequence_id, self.policy.interval) {
            let (value, report) = self.run_cycle(work);
            (value, Some(report))
        } else {
            (work(), None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::policy::BackupTemplate;
    use std::num::NonZeroU64;
    use std::time::Duration;
    use tempfile::TempDir;

    fn rotator(dir: &Path, keep: usize) -> BackupRotator {
        let storage = dir.join("store.db");
        fs::write(&storage, b"live store contents").unwrap();
        let policy = BackupPolicy {
            interval: NonZeroU64::new(5).unwrap(),
            keep,
            template: BackupTemplate::parse("{timestamp}.bak.db").unwrap(),
        };
        BackupRotator::new(&storage, dir, policy)
    }

    fn backup_with_age(dir: &Path, name: &str, age_secs: u64) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, name).unwrap();
        let mtime = SystemTime::now() - Duration::from_secs(age_secs);
        fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(mtime)
            .unwrap();
        path
    }

    #[test]
    fn create_copies_store_bytes() {
        let dir = TempDir::new().unwrap();
        let r = rotator(dir.path(), 5);

        let path = r.create_backup().unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"live store contents");
        assert!(r.policy.template.matches(&path.file_name().unwrap().to_string_lossy()));
    }

    #[test]
    fn create_fails_when_store_missing() {
        let dir = TempDir::new().unwrap();
        let r = rotator(dir.path(), 5);
        fs::remove_file(dir.path().join("store.db")).unwrap();

        assert!(matches!(r.create_backup(), Err(BackupError::Create { .. })));
    }

    #[test]
    fn prune_is_noop_within_retention() {
        let dir = TempDir::new().unwrap();
        let r = rotator(dir.path(), 5);
        for i in 0..3 {
            backup_with_age(dir.path(), &format!("{i}.bak.db"), i * 10);
        }

        let outcome = r.prune_backups().unwrap();
        assert!(outcome.removed.is_empty());
        assert_eq!(r.list_backups().unwrap().len(), 3);
    }

    #[test]
    fn prune_ignores_unrelated_files() {
        let dir = TempDir::new().unwrap();
        let r = rotator(dir.path(), 1);
        backup_with_age(dir.path(), "1.bak.db", 10);
        backup_with_age(dir.path(), "2.bak.db", 5);
        fs::write(dir.path().join("notes.txt"), "keep me").unwrap();

        r.prune_backups().unwrap();

        assert!(dir.path().join("store.db").exists());
        assert!(dir.path().join("notes.txt").exists());
        assert!(dir.path().join("2.bak.db").exists());
        assert!(!dir.path().join("1.bak.db").exists());
    }

    #[test]
    fn prune_continues_past_failed_delete() {
        let dir = TempDir::new().unwrap();
        let r = rotator(dir.path(), 5);

        // A directory matches the pattern but cannot be removed as a file.
        let stuck = dir.path().join("1.bak.db");
        fs::create_dir(&stuck).unwrap();

        // Every regular backup is newer than the directory.
        let now = SystemTime::now();
        for i in 2..=8u64 {
            let path = dir.path().join(format!("{i}.bak.db"));
            fs::write(&path, b"old").unwrap();
            fs::File::options()
                .write(true)
                .open(&path)
                .unwrap()
                .set_modified(now + Duration::from_secs((10 - i) * 60))
                .unwrap();
        }

        let outcome = r.prune_backups().unwrap();

        assert_eq!(outcome.failed, vec![stuck.clone()]);
        assert_eq!(outcome.removed.len(), 2);
        assert!(stuck.exists());
        assert!(!dir.path().join("7.bak.db").exists());
        assert!(!dir.path().join("8.bak.db").exists());
        for i in 2..=6 {
            assert!(dir.path().join(format!("{i}.bak.db")).exists());
        }
    }

    #[test]
    fn list_is_newest_first() {
        let dir = TempDir::new().unwrap();
        let r = rotator(dir.path(), 5);
        backup_with_age(dir.path(), "old.bak.db", 300);
        backup_with_age(dir.path(), "new.bak.db", 1);
        backup_with_age(dir.path(), "mid.bak.db", 100);

        let names: Vec<String> = r
            .list_backups()
            .unwrap()
            .into_iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["new.bak.db", "mid.bak.db", "old.bak.db"]);
    }

    #[test]
    fn run_cycle_returns_work_value_and_report() {
        let dir = TempDir::new().unwrap();
        let r = rotator(dir.path(), 5);

        let (value, report) = r.run_cycle(|| 7);
        assert_eq!(value, 7);
        assert!(report.is_clean());
        assert!(report.created.is_some_and(|p| p.exists()));
    }

    #[test]
    fn run_cycle_reports_create_failure_without_affecting_work() {
        let dir = TempDir::new().unwrap();
        let r = rotator(dir.path(), 5);
        fs::remove_file(dir.path().join("store.db")).unwrap();

        let (value, report) = r.run_cycle(|| "primary done");
        assert_eq!(value, "primary done");
        assert_eq!(report.errors.len(), 1);
        assert!(report.created.is_none());
    }

    #[test]
    fn after_create_skips_off_interval_ids() {
        let dir = TempDir::new().unwrap();
        let r = rotator(dir.path(), 5);

        let ((), report) = r.after_create(11, || ());
        assert!(report.is_none());
        assert!(r.list_backups().unwrap().is_empty());

        let ((), report) = r.after_create(10, || ());
        assert!(report.is_some());
        assert_eq!(r.list_backups().unwrap().len(), 1);
    }
}
