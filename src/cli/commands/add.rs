//! `passvault add`: save your own password for a new account.

use crate::cli::output;
use crate::cli::{new_account_target, prompt_new_secret, read_password_value, Cli, Context, SECRET_ENV};
use crate::errors::Result;

/// Execute the `add` command.
pub fn execute(cli: &Cli, service: Option<&str>, login: Option<&str>) -> Result<()> {
    let mut ctx = Context::load(cli)?;

    let (service, login) = new_account_target(&ctx.store, service, login)?;
    let password = read_password_value("password")?;
    let secret = prompt_new_secret(SECRET_ENV, "secret key")?;

    let sealed = ctx.seal(&password, &secret)?;
    let report = ctx.save_new_account(&service, &login, &sealed, || {
        output::success(&format!(
            "Password for '{login}' at '{service}' saved successfully"
        ));
    })?;

    output::print_backup_report(report.as_ref());
    Ok(())
}
