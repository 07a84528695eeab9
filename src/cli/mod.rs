//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod clipboard;
pub mod commands;
pub mod context;
pub mod output;

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use dialoguer::{Input, Password, Select};
use zeroize::Zeroizing;

use crate::errors::{PassVaultError, Result};
use crate::vault::{Account, Service, Store};

pub use context::Context;

/// Unlocking secret for non-interactive use (scripts, tests).
pub const SECRET_ENV: &str = "PASSVAULT_SECRET";

/// New unlocking secret for `set` and `change-secret` in non-interactive use.
pub const NEW_SECRET_ENV: &str = "PASSVAULT_NEW_SECRET";

/// PassVault CLI: local encrypted password vault.
#[derive(Parser)]
#[command(
    name = "passvault",
    about = "Local encrypted password vault with rotating backups",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the password store and its backups
    #[arg(long, env = "PASSVAULT_STORAGE_PATH", global = true)]
    pub storage_path: Option<PathBuf>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Add your own password for a new account
    Add {
        /// Service name (e.g. github)
        service: Option<String>,
        /// Account login
        login: Option<String>,
    },

    /// Generate a password for a new account and copy it to the clipboard
    Gen {
        /// Service name (e.g. github)
        service: Option<String>,
        /// Account login
        login: Option<String>,
        /// Length of the generated password
        #[arg(short, long)]
        length: Option<usize>,
    },

    /// Copy a saved password to the clipboard
    Get {
        /// Service name
        service: Option<String>,
        /// Account login
        login: Option<String>,
        /// Print the password instead of copying it
        #[arg(long)]
        print: bool,
    },

    /// Set a new password for an existing account
    Set {
        /// Service name
        service: Option<String>,
        /// Account login
        login: Option<String>,
        /// Generate a secure password instead of typing one
        #[arg(short, long)]
        generate: bool,
        /// Length of the generated password
        #[arg(long, requires = "generate")]
        length: Option<usize>,
    },

    /// Delete a saved password
    Del {
        /// Service name
        service: Option<String>,
        /// Account login
        login: Option<String>,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Re-encrypt a password under a new secret key
    ChangeSecret {
        /// Service name
        service: Option<String>,
        /// Account login
        login: Option<String>,
    },

    /// List services
    List {
        /// Show account logins as well
        #[arg(short, long)]
        accounts: bool,
    },

    /// Print the environment variables PassVault needs
    Requirements,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Read a non-empty environment variable.
pub fn env_secret(name: &str) -> Option<Zeroizing<String>> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .map(Zeroizing::new)
}

/// Ask for a line of plain text.
pub fn prompt_text(prompt: &str) -> Result<String> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .interact_text()
        .map_err(|e| PassVaultError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(value.trim().to_string())
}

/// Ask for the unlocking secret of an existing password.
///
/// `attempt` is zero on the first try; later attempts show a hint.
/// `preset` short-circuits the prompt (taken from `PASSVAULT_SECRET`).
pub fn prompt_unlock_secret(
    attempt: u32,
    preset: Option<&Zeroizing<String>>,
) -> Result<Zeroizing<String>> {
    if let Some(secret) = preset {
        return Ok(secret.clone());
    }

    if attempt > 0 {
        output::warning("Incorrect secret, try again");
    }

    let secret = Password::new()
        .with_prompt("Enter secret")
        .interact()
        .map_err(|e| PassVaultError::CommandFailed(format!("secret prompt: {e}")))?;
    Ok(Zeroizing::new(secret))
}

/// Ask for a new unlocking secret, with confirmation.
///
/// `env_var` is checked first so scripts can supply the value.
pub fn prompt_new_secret(env_var: &str, label: &str) -> Result<Zeroizing<String>> {
    if let Some(secret) = env_secret(env_var) {
        return Ok(secret);
    }

    let secret = Password::new()
        .with_prompt(format!("Enter {label}"))
        .with_confirmation(format!("Enter {label} again"), "Secret keys are not equal")
        .interact()
        .map_err(|e| PassVaultError::CommandFailed(format!("secret prompt: {e}")))?;
    Ok(Zeroizing::new(secret))
}

/// Read the account password to store.
///
/// Piped stdin is used as-is (trailing newline trimmed); otherwise the
/// user is prompted twice.
pub fn read_password_value(label: &str) -> Result<Zeroizing<String>> {
    let value = if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        Zeroizing::new(buf.trim_end_matches(['\r', '\n']).to_string())
    } else {
        let pw = Password::new()
            .with_prompt(format!("Enter {label}"))
            .with_confirmation(format!("Enter {label} again"), "Passwords are not equal")
            .interact()
            .map_err(|e| PassVaultError::CommandFailed(format!("password prompt: {e}")))?;
        Zeroizing::new(pw)
    };

    if value.is_empty() {
        return Err(PassVaultError::CommandFailed(format!(
            "{label} cannot be empty"
        )));
    }
    Ok(value)
}

/// Resolve the service and login for a new account.
///
/// Missing values are prompted for.  An interactively entered login
/// that already exists is asked for again; one given on the command
/// line is an error.
pub fn new_account_target(
    store: &Store,
    service: Option<&str>,
    login: Option<&str>,
) -> Result<(String, String)> {
    let service_name = match service {
        Some(name) => name.trim().to_string(),
        None => prompt_text("Enter service name")?,
    };
    if service_name.is_empty() {
        return Err(PassVaultError::CommandFailed(
            "service name cannot be empty".into(),
        ));
    }

    let existing = store.find_service(&service_name)?;
    let taken = |login: &str| -> Result<bool> {
        match &existing {
            Some(svc) => store.account_exists(svc, login),
            None => Ok(false),
        }
    };

    if let Some(login) = login {
        let login = login.trim();
        if login.is_empty() {
            return Err(PassVaultError::CommandFailed("login cannot be empty".into()));
        }
        if taken(login)? {
            return Err(PassVaultError::AccountAlreadyExists {
                service: service_name,
                login: login.to_string(),
            });
        }
        return Ok((service_name, login.to_string()));
    }

    loop {
        let login = prompt_text("Enter login")?;
        if login.is_empty() {
            output::warning("Login cannot be empty.");
            continue;
        }
        if taken(&login)? {
            output::warning(&format!(
                "Account with login '{login}' at '{service_name}' already exists, to update it use the `set` command. Use another login."
            ));
            continue;
        }
        return Ok((service_name, login));
    }
}

/// Resolve an existing service, by argument or interactive selection.
pub fn select_service(store: &Store, name: Option<&str>) -> Result<Service> {
    if let Some(name) = name {
        return store.require_service(name.trim());
    }

    let services: Vec<Service> = store
        .list_services(false)?
        .into_iter()
        .map(|summary| summary.service)
        .collect();

    if services.is_empty() {
        return Err(PassVaultError::CommandFailed(
            "there are no added services yet".into(),
        ));
    }

    let names: Vec<&str> = services.iter().map(|s| s.name.as_str()).collect();
    let index = Select::new()
        .with_prompt("Select service")
        .items(&names)
        .default(0)
        .interact()
        .map_err(|e| PassVaultError::CommandFailed(format!("select prompt: {e}")))?;

    Ok(services[index].clone())
}

/// Resolve an existing account of `service`.
pub fn select_account(store: &Store, service: &Service, login: Option<&str>) -> Result<Account> {
    if let Some(login) = login {
        return store.require_account(service, login.trim());
    }

    let accounts = store.accounts_for_service(service.id)?;
    if accounts.is_empty() {
        return Err(PassVaultError::CommandFailed(format!(
            "accounts for service '{}' not found",
            service.name
        )));
    }

    let logins: Vec<&str> = accounts.iter().map(|a| a.login.as_str()).collect();
    let index = Select::new()
        .with_prompt(format!("Select login at '{}'", service.name))
        .items(&logins)
        .default(0)
        .interact()
        .map_err(|e| PassVaultError::CommandFailed(format!("select prompt: {e}")))?;

    Ok(accounts[index].clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::EncryptedSecret;
    use clap::CommandFactory;
    use tempfile::TempDir;

    fn store_with_account() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let mut store = Store::open(&dir.path().join("s.db")).unwrap();
        let sealed = EncryptedSecret {
            encrypted: "e".into(),
            salt: "s".into(),
        };
        store
            .create_account_with_password("github", "alice", &sealed)
            .unwrap();
        (dir, store)
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn new_target_accepts_fresh_login() {
        let (_dir, store) = store_with_account();
        let (svc, login) = new_account_target(&store, Some("github"), Some("bob")).unwrap();
        assert_eq!((svc.as_str(), login.as_str()), ("github", "bob"));
    }

    #[test]
    fn new_target_rejects_existing_login() {
        let (_dir, store) = store_with_account();
        let err = new_account_target(&store, Some("github"), Some("alice")).unwrap_err();
        assert!(matches!(err, PassVaultError::AccountAlreadyExists { .. }));
    }

    #[test]
    fn new_target_rejects_blank_service() {
        let (_dir, store) = store_with_account();
        assert!(new_account_target(&store, Some("  "), Some("bob")).is_err());
    }

    #[test]
    fn select_by_argument() {
        let (_dir, store) = store_with_account();
        let svc = select_service(&store, Some("github")).unwrap();
        let account = select_account(&store, &svc, Some("alice")).unwrap();
        assert_eq!(account.login, "alice");

        assert!(matches!(
            select_service(&store, Some("gitlab")),
            Err(PassVaultError::ServiceNotFound(_))
        ));
        assert!(matches!(
            select_account(&store, &svc, Some("carol")),
            Err(PassVaultError::AccountNotFound { .. })
        ));
    }
}
