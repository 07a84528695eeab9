//! `passvault get`: copy a saved password to the clipboard.

use crate::cli::{clipboard, output};
use crate::cli::{select_account, select_service, Cli, Context};
use crate::errors::Result;

/// Execute the `get` command.
///
/// With `--print`, or when no clipboard is available, the password goes
/// to stdout with nothing else on the line.
pub fn execute(cli: &Cli, service: Option<&str>, login: Option<&str>, print: bool) -> Result<()> {
    let ctx = Context::load(cli)?;

    let service = select_service(&ctx.store, service)?;
    let account = select_account(&ctx.store, &service, login)?;
    let password = ctx.unlock_password(&account)?;

    if !print && clipboard::copy(&password) {
        output::success(&format!(
            "Password for '{}' at '{}' copied to clipboard",
            account.login, service.name
        ));
        return Ok(());
    }

    println!("{}", password.as_str());
    Ok(())
}
