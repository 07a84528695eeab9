//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::backup::BackupReport;
use crate::config::EnvRequirement;
use crate::vault::ServiceSummary;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print services, optionally with their account logins.
pub fn print_services_table(services: &[ServiceSummary], with_accounts: bool) {
    if services.is_empty() {
        info("There are no added services yet.");
        tip("Run `passvault add` or `passvault gen` to save your first password.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if with_accounts {
        table.set_header(vec!["Service", "Accounts", "Created"]);
    } else {
        table.set_header(vec!["Service", "Created"]);
    }

    for s in services {
        let created = s.created_at.format("%Y-%m-%d %H:%M:%S").to_string();
        if with_accounts {
            let logins: Vec<&str> = s.accounts.iter().map(|a| a.login.as_str()).collect();
            table.add_row(vec![s.service.name.clone(), logins.join("\n"), created]);
        } else {
            table.add_row(vec![s.service.name.clone(), created]);
        }
    }

    println!("{table}");
}

/// Print the environment variables the tool reads.
pub fn print_requirements(requirements: &[EnvRequirement]) {
    println!("{}", style("Environment variables:").bold());
    for req in requirements {
        let tag = if req.required {
            style("required").red().to_string()
        } else {
            style("optional").dim().to_string()
        };
        println!("  {} ({tag})", style(req.name).cyan());
        println!("      {}", req.description);
    }
}

/// Surface the outcome of a backup cycle.  Failures are warnings only;
/// the command that triggered the cycle has already succeeded.
pub fn print_backup_report(report: Option<&BackupReport>) {
    let Some(report) = report else {
        return;
    };

    if let Some(path) = &report.created {
        info(&format!("Backup saved to {}", path.display()));
    }
    if report.is_clean() {
        return;
    }

    for path in &report.pruned.failed {
        warning(&format!(
            "Unable to remove unnecessary backup file {}",
            path.display()
        ));
    }
    for err in &report.errors {
        warning(&err.to_string());
    }
}
