//! `passvault del`: remove an account and its password.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{select_account, select_service, Cli, Context};
use crate::errors::{PassVaultError, Result};

/// Execute the `del` command.
///
/// The service goes too once its last account is gone.
pub fn execute(cli: &Cli, service: Option<&str>, login: Option<&str>, force: bool) -> Result<()> {
    let mut ctx = Context::load(cli)?;

    let service = select_service(&ctx.store, service)?;
    let account = select_account(&ctx.store, &service, login)?;

    // Only the owner of the secret may delete.
    let _current = ctx.unlock_password(&account)?;

    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete password for '{}' at '{}'?",
                account.login, service.name
            ))
            .default(false)
            .interact()
            .map_err(|e| PassVaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    ctx.store.delete_account_with_password(&account)?;
    output::success(&format!(
        "Account '{}' at '{}' deleted",
        account.login, service.name
    ));

    if ctx.store.delete_service_if_empty(service.id)? {
        output::info(&format!(
            "Service '{}' has no accounts left and was removed",
            service.name
        ));
    }
    Ok(())
}
