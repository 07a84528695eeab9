//! `passvault gen`: generate a password for a new account.

use crate::cli::{clipboard, output};
use crate::cli::{new_account_target, prompt_new_secret, Cli, Context, SECRET_ENV};
use crate::crypto::generate;
use crate::errors::Result;

/// Execute the `gen` command.
pub fn execute(
    cli: &Cli,
    service: Option<&str>,
    login: Option<&str>,
    length: Option<usize>,
) -> Result<()> {
    let mut ctx = Context::load(cli)?;

    let length = length.unwrap_or(ctx.settings.password.length);
    ctx.settings.check_password_length(length)?;
    let password = generate(&ctx.settings.password.with_length(length))?;

    let (service, login) = new_account_target(&ctx.store, service, login)?;
    let secret = prompt_new_secret(SECRET_ENV, "secret key")?;

    let sealed = ctx.seal(&password, &secret)?;
    let report = ctx.save_new_account(&service, &login, &sealed, || {
        output::success(&format!(
            "Password for '{login}' at '{service}' generated and saved"
        ));
        if clipboard::copy(&password) {
            output::info("Password copied to clipboard");
        } else {
            output::warning("Clipboard unavailable, printing the password instead");
            println!("{}", password.as_str());
        }
    })?;

    output::print_backup_report(report.as_ref());
    Ok(())
}
