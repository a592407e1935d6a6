//! CLI error types.

use sd_client::ClientError;
use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Backend or session error.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The command needs a session and none could be established.
    #[error("not logged in (run `sd login`)")]
    NotAuthenticated,

    /// Validation error.
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Operation cancelled.
    #[error("operation cancelled")]
    Cancelled,
}

impl CliError {
    /// Whether the user has already been shown this error.
    ///
    /// Classified backend failures are printed by the notifier when they
    /// happen, so printing them again on exit would duplicate the message.
    #[must_use]
    pub const fn is_reported(&self) -> bool {
        matches!(self, Self::Client(ClientError::Api(_)))
    }
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
