//! CLI configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sd_client::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use sd_client::{ClientConfig, FileStorage};
use serde::{Deserialize, Serialize};

use crate::{CliError, CliResult};

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Backend base URL, including the API prefix.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Output format.
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Where the session is kept between runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_file: Option<PathBuf>,
}

fn default_server_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            timeout_secs: default_timeout_secs(),
            output_format: OutputFormat::default(),
            session_file: None,
        }
    }
}

impl CliConfig {
    /// Loads configuration from the default file.
    pub fn load() -> CliResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads configuration from `path`, or the defaults if it does not exist.
    pub fn load_from(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| CliError::Config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Saves configuration to the default file.
    pub fn save(&self) -> CliResult<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Saves configuration to `path`, creating its directory.
    pub fn save_to(&self, path: &Path) -> CliResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Gets the configuration file path.
    pub fn config_path() -> CliResult<PathBuf> {
        let home = dirs_next::home_dir()
            .ok_or_else(|| CliError::Config("could not determine home directory".to_string()))?;
        Ok(home.join(".shelfdesk").join("config.toml"))
    }

    /// Transport settings, with an optional server override from the command line.
    pub fn client_config(&self, server_override: Option<&str>) -> CliResult<ClientConfig> {
        let config = ClientConfig::new(server_override.unwrap_or(&self.server_url))
            .with_timeout(Duration::from_secs(self.timeout_secs));
        config.validate()?;
        Ok(config)
    }

    /// Session file location: override, then configured, then the default.
    pub fn session_path(&self, override_path: Option<&Path>) -> CliResult<PathBuf> {
        match override_path.or(self.session_file.as_deref()) {
            Some(path) => Ok(path.to_path_buf()),
            None => FileStorage::default_path().map_err(|e| CliError::Config(e.to_string())),
        }
    }

    /// Sets a value by key, as used by `sd config set`.
    pub fn set(&mut self, key: &str, value: &str) -> CliResult<()> {
        match key {
            "server_url" | "server" => {
                ClientConfig::new(value).validate()?;
                self.server_url = value.to_string();
            }
            "timeout_secs" | "timeout" => {
                self.timeout_secs = match value.parse() {
                    Ok(secs) if secs > 0 => secs,
                    _ => {
                        return Err(CliError::InvalidArgument(format!(
                            "timeout must be a positive number of seconds, got '{value}'"
                        )))
                    }
                };
            }
            "output_format" | "output" => {
                self.output_format = value.parse()?;
            }
            "session_file" => {
                self.session_file = if value.is_empty() || value == "none" {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            _ => {
                return Err(CliError::InvalidArgument(format!(
                    "unknown configuration key: {key}. Known keys: server_url, timeout_secs, output_format, session_file"
                )));
            }
        }
        Ok(())
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
    /// Identifiers only.
    Quiet,
}

impl std::str::FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "quiet" => Ok(Self::Quiet),
            _ => Err(CliError::InvalidArgument(format!(
                "unknown output format: {s}. Supported: table, json, quiet"
            ))),
        }
    }
}
