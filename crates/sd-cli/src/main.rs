//! # Shelfdesk CLI
//!
//! Terminal console for the Shelfdesk users and books backend.

#![forbid(unsafe_code)]

use clap::Parser;
use sd_cli::{
    cli::{Cli, Command},
    commands::{
        run_book, run_config, run_login, run_logout, run_profile, run_register, run_status,
        run_user, run_whoami,
    },
    config::CliConfig,
    output::error,
    CliResult, Console,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load configuration
    let mut config = match CliConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error(&format!("Failed to load configuration: {e}"));
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli, &mut config).await {
        if !e.is_reported() {
            error(&e.to_string());
        }
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli, config: &mut CliConfig) -> CliResult<()> {
    if let Command::Config(cmd) = cli.command {
        return run_config(cmd, config);
    }

    let console = Console::open(config, &cli)?;
    if let Some(path) = cli.command.protected_path() {
        console.require_session(path).await?;
    }

    match cli.command {
        Command::Login { email, password } => run_login(&console, email, password).await,
        Command::Register {
            username,
            email,
            password,
        } => run_register(&console, username, email, password).await,
        Command::Logout => {
            run_logout(&console);
            Ok(())
        }
        Command::Whoami => run_whoami(&console),
        Command::Status => {
            let server = config.client_config(cli.server.as_deref())?.base_url;
            run_status(&console, &server).await
        }
        Command::Profile(cmd) => run_profile(cmd, &console).await,
        Command::Users(cmd) => run_user(cmd, &console).await,
        Command::Books(cmd) => run_book(cmd, &console).await,
        Command::Config(_) => Ok(()),
    }
}
