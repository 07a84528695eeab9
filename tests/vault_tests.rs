//! Integration tests for the PassVault store and unlock flow.

use passvault::crypto::GeneratorSettings;
use passvault::errors::PassVaultError;
use passvault::vault::{unlock, EncryptedSecret, Store};
use tempfile::TempDir;

/// Helper: open a store inside a fresh temp dir.
fn open_store() -> (TempDir, Store) {
    let dir = TempDir::new().expect("create temp dir");
    let store = Store::open(&dir.path().join("store.db")).expect("open store");
    (dir, store)
}

fn seal(plaintext: &str, secret: &str) -> EncryptedSecret {
    EncryptedSecret::seal(plaintext, secret, 32, &GeneratorSettings::salt_default()).unwrap()
}

// ---------------------------------------------------------------------------
// Add, reopen, read back
// ---------------------------------------------------------------------------

#[test]
fn saved_password_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.db");

    {
        let mut store = Store::open(&path).unwrap();
        store
            .create_account_with_password("github", "alice", &seal("hunter2", "s3cret"))
            .unwrap();
    }

    let store = Store::open(&path).unwrap();
    let svc = store.require_service("github").unwrap();
    let account = store.require_account(&svc, "alice").unwrap();
    let record = store.load_password(account.password_id).unwrap();
    assert_eq!(record.open("s3cret", 32).unwrap().as_str(), "hunter2");
}

#[test]
fn sequence_ids_increase_across_services() {
    let (_dir, mut store) = open_store();

    let a = store
        .create_account_with_password("github", "a", &seal("1", "s"))
        .unwrap();
    let b = store
        .create_account_with_password("gitlab", "a", &seal("2", "s"))
        .unwrap();
    assert!(b > a);
}

#[test]
fn each_password_may_have_its_own_secret() {
    let (_dir, mut store) = open_store();
    store
        .create_account_with_password("mail", "work", &seal("pw-work", "one"))
        .unwrap();
    store
        .create_account_with_password("mail", "home", &seal("pw-home", "two"))
        .unwrap();
    let svc = store.require_service("mail").unwrap();

    let work = store.require_account(&svc, "work").unwrap();
    let home = store.require_account(&svc, "home").unwrap();

    let work_rec = store.load_password(work.password_id).unwrap();
    let home_rec = store.load_password(home.password_id).unwrap();
    assert!(work_rec.open("two", 32).is_err());
    assert_eq!(home_rec.open("two", 32).unwrap().as_str(), "pw-home");
}

// ---------------------------------------------------------------------------
// Change secret
// ---------------------------------------------------------------------------

#[test]
fn change_secret_reencrypts_same_plaintext() {
    let (_dir, mut store) = open_store();
    store
        .create_account_with_password("github", "alice", &seal("hunter2", "old"))
        .unwrap();
    let svc = store.require_service("github").unwrap();
    let account = store.require_account(&svc, "alice").unwrap();

    let plain = store
        .load_password(account.password_id)
        .unwrap()
        .open("old", 32)
        .unwrap();
    store
        .update_password(account.password_id, &seal(&plain, "new"))
        .unwrap();

    let record = store.load_password(account.password_id).unwrap();
    assert!(record.open("old", 32).is_err());
    assert_eq!(record.open("new", 32).unwrap().as_str(), "hunter2");
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn deleting_last_account_allows_service_removal() {
    let (_dir, mut store) = open_store();
    store
        .create_account_with_password("github", "alice", &seal("pw", "s"))
        .unwrap();
    store
        .create_account_with_password("github", "bob", &seal("pw", "s"))
        .unwrap();
    let svc = store.require_service("github").unwrap();

    let alice = store.require_account(&svc, "alice").unwrap();
    store.delete_account_with_password(&alice).unwrap();
    assert!(!store.delete_service_if_empty(svc.id).unwrap());

    let bob = store.require_account(&svc, "bob").unwrap();
    store.delete_account_with_password(&bob).unwrap();
    assert!(store.delete_service_if_empty(svc.id).unwrap());

    assert!(store.find_service("github").unwrap().is_none());
    assert_eq!(store.password_count().unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Unlock retry against a real record
// ---------------------------------------------------------------------------

#[test]
fn unlock_recovers_after_typos() {
    let record = seal("hunter2", "correct");
    let mut inputs = vec!["correct", "typo-2", "typo-1"];

    let plain = unlock(
        5,
        |_| Ok::<_, PassVaultError>(inputs.pop().unwrap()),
        |secret| record.open(secret, 32),
    )
    .unwrap();

    assert_eq!(plain.as_str(), "hunter2");
    assert!(inputs.is_empty());
}

#[test]
fn unlock_gives_up_with_last_error() {
    let record = seal("hunter2", "correct");

    let err = unlock(2, |_| Ok("nope"), |secret| record.open(secret, 32)).unwrap_err();

    match err {
        PassVaultError::UnlockExhausted { attempts, source } => {
            assert_eq!(attempts, 3);
            assert!(matches!(*source, PassVaultError::DecryptionFailed));
        }
        other => panic!("unexpected error: {other}"),
    }
}
