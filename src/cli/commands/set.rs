//! `passvault set`: replace the password of an existing account.

use crate::cli::{clipboard, output};
use crate::cli::{
    prompt_new_secret, read_password_value, select_account, select_service, Cli, Context,
    NEW_SECRET_ENV,
};
use crate::crypto::generate;
use crate::errors::Result;

/// Execute the `set` command.
///
/// The old secret must unlock the current password before the new one
/// is stored; the new password may use a different secret.
pub fn execute(
    cli: &Cli,
    service: Option<&str>,
    login: Option<&str>,
    generate_password: bool,
    length: Option<usize>,
) -> Result<()> {
    let ctx = Context::load(cli)?;

    let new_password = if generate_password {
        let length = length.unwrap_or(ctx.settings.password.length);
        ctx.settings.check_password_length(length)?;
        generate(&ctx.settings.password.with_length(length))?
    } else {
        read_password_value("new password")?
    };

    let service = select_service(&ctx.store, service)?;
    let account = select_account(&ctx.store, &service, login)?;

    // Proves the caller knows the current secret.
    let _current = ctx.unlock_password(&account)?;

    let secret = prompt_new_secret(NEW_SECRET_ENV, "new secret key")?;
    let sealed = ctx.seal(&new_password, &secret)?;
    ctx.store.update_password(account.password_id, &sealed)?;

    output::success(&format!(
        "Password for '{}' at '{}' updated",
        account.login, service.name
    ));

    if generate_password {
        if clipboard::copy(&new_password) {
            output::info("Password copied to clipboard");
        } else {
            println!("{}", new_password.as_str());
        }
    }
    Ok(())
}
