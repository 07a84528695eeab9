use clap::Parser;
use passvault::cli::commands;
use passvault::cli::{output, Cli, Commands};
use passvault::config::Settings;
use passvault::errors::PassVaultError;
use tracing_subscriber::EnvFilter;

/// Filter directives for diagnostics on stderr, e.g. `PASSVAULT_LOG=debug`.
const LOG_ENV: &str = "PASSVAULT_LOG";

fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Add {
            ref service,
            ref login,
        } => commands::add::execute(&cli, service.as_deref(), login.as_deref()),
        Commands::Gen {
            ref service,
            ref login,
            length,
        } => commands::gen::execute(&cli, service.as_deref(), login.as_deref(), length),
        Commands::Get {
            ref service,
            ref login,
            print,
        } => commands::get::execute(&cli, service.as_deref(), login.as_deref(), print),
        Commands::Set {
            ref service,
            ref login,
            generate,
            length,
        } => commands::set::execute(
            &cli,
            service.as_deref(),
            login.as_deref(),
            generate,
            length,
        ),
        Commands::Del {
            ref service,
            ref login,
            force,
        } => commands::del::execute(&cli, service.as_deref(), login.as_deref(), force),
        Commands::ChangeSecret {
            ref service,
            ref login,
        } => commands::change_secret::execute(&cli, service.as_deref(), login.as_deref()),
        Commands::List { accounts } => commands::list::execute(&cli, accounts),
        Commands::Requirements => commands::requirements::execute(),
        Commands::Completions { ref shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        if matches!(e, PassVaultError::MissingStoragePath) {
            output::print_requirements(&Settings::requirements());
        }
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("error"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
