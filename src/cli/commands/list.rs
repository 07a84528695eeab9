//! `passvault list`: show saved services.

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::Result;

/// Execute the `list` command.  No secret is needed.
pub fn execute(cli: &Cli, with_accounts: bool) -> Result<()> {
    let ctx = Context::load(cli)?;
    let services = ctx.store.list_services(with_accounts)?;
    output::print_services_table(&services, with_accounts);

    if !services.is_empty() {
        let count = ctx.store.password_count()?;
        output::tip(&format!(
            "{count} password(s) across {} service(s)",
            services.len()
        ));
    }
    Ok(())
}
