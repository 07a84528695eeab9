//! `passvault change-secret`: re-encrypt a password under a new secret.

use crate::cli::output;
use crate::cli::{prompt_new_secret, select_account, select_service, Cli, Context, NEW_SECRET_ENV};
use crate::errors::Result;

/// Execute the `change-secret` command.
pub fn execute(cli: &Cli, service: Option<&str>, login: Option<&str>) -> Result<()> {
    let ctx = Context::load(cli)?;

    let service = select_service(&ctx.store, service)?;
    let account = select_account(&ctx.store, &service, login)?;
    let password = ctx.unlock_password(&account)?;

    let secret = prompt_new_secret(NEW_SECRET_ENV, "new secret key")?;
    let sealed = ctx.seal(&password, &secret)?;
    ctx.store.update_password(account.password_id, &sealed)?;

    output::success(&format!(
        "Secret for '{}' at '{}' changed",
        account.login, service.name
    ));
    Ok(())
}
