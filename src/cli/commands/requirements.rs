//! `passvault requirements`: describe the environment variables.

use crate::cli::output;
use crate::config::Settings;
use crate::errors::Result;

/// Execute the `requirements` command.
pub fn execute() -> Result<()> {
    output::print_requirements(&Settings::requirements());
    Ok(())
}
