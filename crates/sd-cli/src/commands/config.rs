//! Configuration management commands.

use crate::cli::ConfigCommand;
use crate::output::{info, prompt, success};
use crate::{CliConfig, CliResult};

/// Runs a config command.
pub fn run_config(cmd: ConfigCommand, config: &mut CliConfig) -> CliResult<()> {
    match cmd {
        ConfigCommand::Show => show_config(config),
        ConfigCommand::Set { key, value } => {
            config.set(&key, &value)?;
            config.save()?;
            success(&format!("Set {key} = {value}"));
            Ok(())
        }
        ConfigCommand::Init => init_config(config),
    }
}

/// Shows the current configuration.
fn show_config(config: &CliConfig) -> CliResult<()> {
    info(&format!("Configuration file: {}", CliConfig::config_path()?.display()));
    println!();
    println!("server_url: {}", config.server_url);
    println!("timeout_secs: {}", config.timeout_secs);
    println!("output_format: {:?}", config.output_format);
    println!("session_file: {}", config.session_path(None)?.display());
    Ok(())
}

/// Initializes configuration interactively.
fn init_config(config: &mut CliConfig) -> CliResult<()> {
    info("Initializing Shelfdesk CLI configuration...");
    println!();

    let server = prompt(&format!("Server URL [{}]: ", config.server_url))?;
    if !server.is_empty() {
        config.set("server_url", &server)?;
    }

    let timeout = prompt(&format!("Timeout in seconds [{}]: ", config.timeout_secs))?;
    if !timeout.is_empty() {
        config.set("timeout_secs", &timeout)?;
    }

    let format = prompt(&format!(
        "Output format (table/json/quiet) [{:?}]: ",
        config.output_format
    ))?;
    if !format.is_empty() {
        config.set("output_format", &format)?;
    }

    config.save()?;

    println!();
    success(&format!(
        "Configuration saved to: {}",
        CliConfig::config_path()?.display()
    ));
    Ok(())
}
