//! SQLite-backed store for services, accounts and encrypted passwords.
//!
//! The store never sees plaintext.  Password rows carry the envelope and
//! salt as two text columns that are always written together.  Row ids
//! use `AUTOINCREMENT`, so a deleted password's id is never handed out
//! again; the backup trigger relies on that.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::errors::{PassVaultError, Result};

use super::record::{Account, Service, ServiceSummary};
use super::secret::EncryptedSecret;

const SCHEMA: &str = "
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS services (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS passwords (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    encrypted  TEXT NOT NULL,
    salt       TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS accounts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    login       TEXT NOT NULL,
    service_id  INTEGER NOT NULL REFERENCES services(id),
    password_id INTEGER NOT NULL REFERENCES passwords(id),
    UNIQUE (login, service_id)
);
";

/// Handle on the storage database.
pub struct Store {
    path: PathBuf,
    conn: Connection,
}

impl Store {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Open (or create) the store at `path` and apply the schema.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // Set restrictive permissions on the store (owner-only).
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(path, perms);
        }

        conn.execute_batch(SCHEMA)?;
        debug!(path = %path.display(), "store opened");

        Ok(Self {
            path: path.to_path_buf(),
            conn,
        })
    }

    /// Returns the path to the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    // ------------------------------------------------------------------
    // Services
    // ------------------------------------------------------------------

    pub fn find_service(&self, name: &str) -> Result<Option<Service>> {
        query_service(&self.conn, name)
    }

    /// Like `find_service`, but a missing service is an error.
    pub fn require_service(&self, name: &str) -> Result<Service> {
        self.find_service(name)?
            .ok_or_else(|| PassVaultError::ServiceNotFound(name.to_string()))
    }

    /// All services sorted by name, optionally with their accounts.
    pub fn list_services(&self, with_accounts: bool) -> Result<Vec<ServiceSummary>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM services ORDER BY name")?;

        let rows = stmt.query_map([], |row| {
            let ts: String = row.get(2)?;
            Ok((
                Service {
                    id: row.get(0)?,
                    name: row.get(1)?,
                },
                ts,
            ))
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            let (service, ts) = row?;
            let created_at = DateTime::parse_from_rfc3339(&ts)
                .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));
            let accounts = if with_accounts {
                self.accounts_for_service(service.id)?
            } else {
                Vec::new()
            };
            summaries.push(ServiceSummary {
                service,
                accounts,
                created_at,
            });
        }

        Ok(summaries)
    }

    /// Delete a service if no accounts reference it any more.
    ///
    /// Returns `true` when the service was removed.
    pub fn delete_service_if_empty(&self, service_id: i64) -> Result<bool> {
        let remaining: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM accounts WHERE service_id = ?1",
            params![service_id],
            |row| row.get(0),
        )?;

        if remaining > 0 {
            return Ok(false);
        }

        self.conn
            .execute("DELETE FROM services WHERE id = ?1", params![service_id])?;
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Accounts
    // ------------------------------------------------------------------

    /// Accounts of a service, sorted by login.
    pub fn accounts_for_service(&self, service_id: i64) -> Result<Vec<Account>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, login, service_id, password_id FROM accounts
             WHERE service_id = ?1 ORDER BY login",
        )?;

        let rows = stmt.query_map(params![service_id], map_account)?;

        let mut accounts = Vec::new();
        for row in rows {
            accounts.push(row?);
        }
        Ok(accounts)
    }

    pub fn find_account(&self, service: &Service, login: &str) -> Result<Option<Account>> {
        let account = self
            .conn
            .query_row(
                "SELECT id, login, service_id, password_id FROM accounts
                 WHERE service_id = ?1 AND login = ?2",
                params![service.id, login],
                map_account,
            )
            .optional()?;
        Ok(account)
    }

    /// Like `find_account`, but a missing account is an error.
    pub fn require_account(&self, service: &Service, login: &str) -> Result<Account> {
        self.find_account(service, login)?
            .ok_or_else(|| PassVaultError::AccountNotFound {
                service: service.name.clone(),
                login: login.to_string(),
            })
    }

    pub fn account_exists(&self, service: &Service, login: &str) -> Result<bool> {
        Ok(self.find_account(service, login)?.is_some())
    }

    /// Insert the service (if new), a password row and the account that
    /// owns it in one transaction.
    ///
    /// Returns the new password id, which doubles as the sequence id
    /// for backup scheduling.  On any error nothing is written, not even
    /// the service.
    pub fn create_account_with_password(
        &mut self,
        service_name: &str,
        login: &str,
        secret: &EncryptedSecret,
    ) -> Result<u64> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        let service = match query_service(&tx, service_name)? {
            Some(service) => service,
            None => {
                tx.execute(
                    "INSERT INTO services (name, created_at) VALUES (?1, ?2)",
                    params![service_name, now],
                )?;
                Service {
                    id: tx.last_insert_rowid(),
                    name: service_name.to_string(),
                }
            }
        };

        let taken = tx
            .query_row(
                "SELECT 1 FROM accounts WHERE service_id = ?1 AND login = ?2",
                params![service.id, login],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if taken {
            return Err(PassVaultError::AccountAlreadyExists {
                service: service.name,
                login: login.to_string(),
            });
        }

        tx.execute(
            "INSERT INTO passwords (encrypted, salt, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)",
            params![secret.encrypted, secret.salt, now],
        )?;
        let password_id = tx.last_insert_rowid();

        tx.execute(
            "INSERT INTO accounts (login, service_id, password_id) VALUES (?1, ?2, ?3)",
            params![login, service.id, password_id],
        )?;

        tx.commit()?;
        debug!(password_id, service = %service.name, "account created");

        u64::try_from(password_id)
            .map_err(|_| PassVaultError::Storage(format!("invalid password id {password_id}")))
    }

    /// Remove an account and its password row together.
    pub fn delete_account_with_password(&mut self, account: &Account) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM accounts WHERE id = ?1", params![account.id])?;
        tx.execute(
            "DELETE FROM passwords WHERE id = ?1",
            params![account.password_id],
        )?;
        tx.commit()?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Passwords
    // ------------------------------------------------------------------

    pub fn load_password(&self, password_id: i64) -> Result<EncryptedSecret> {
        self.conn
            .query_row(
                "SELECT encrypted, salt FROM passwords WHERE id = ?1",
                params![password_id],
                |row| {
                    Ok(EncryptedSecret {
                        encrypted: row.get(0)?,
                        salt: row.get(1)?,
                    })
                },
            )
            .optional()?
            .ok_or_else(|| PassVaultError::Storage(format!("password {password_id} not found")))
    }

    /// Replace the envelope and salt of a password in a single statement.
    pub fn update_password(&self, password_id: i64, secret: &EncryptedSecret) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE passwords SET encrypted = ?1, salt = ?2, updated_at = ?3 WHERE id = ?4",
            params![
                secret.encrypted,
                secret.salt,
                Utc::now().to_rfc3339(),
                password_id
            ],
        )?;

        if changed == 0 {
            return Err(PassVaultError::Storage(format!(
                "password {password_id} not found"
            )));
        }
        Ok(())
    }

    /// Number of password rows.
    pub fn password_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM passwords", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

fn query_service(conn: &Connection, name: &str) -> Result<Option<Service>> {
    let service = conn
        .query_row(
            "SELECT id, name FROM services WHERE name = ?1",
            params![name],
            |row| {
                Ok(Service {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            },
        )
        .optional()?;
    Ok(service)
}

fn map_account(row: &rusqlite::Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: row.get(0)?,
        login: row.get(1)?,
        service_id: row.get(2)?,
        password_id: row.get(3)?,
    })
}
