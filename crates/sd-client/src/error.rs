//! Client error types.

use thiserror::Error;

/// Shown when a live session is rejected by the backend.
pub(crate) const SESSION_EXPIRED: &str = "Your session has expired, please log in again";
const NETWORK_FAILED: &str = "Network connection failed, please check your network settings";
const AUTH_REQUIRED: &str = "Authentication required";
const FORBIDDEN: &str = "You do not have permission to access this resource";
const NOT_FOUND: &str = "The requested resource does not exist";
const INVALID_PARAMS: &str = "Invalid request parameters";
const SERVER_ERROR: &str = "Internal server error";

/// Classified outcome of a failed backend call.
///
/// Every failure leaving the interceptor is exactly one of these. The
/// message is the user-facing text that was already notified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response was received (unreachable host, refused connection, timeout).
    #[error("network error: {}", NETWORK_FAILED)]
    Network {
        /// Transport-level detail, for logs.
        detail: String,
    },

    /// HTTP 401.
    #[error("authentication failed: {}", .message.as_deref().unwrap_or(AUTH_REQUIRED))]
    AuthExpired {
        /// Server-provided message, if any.
        message: Option<String>,
    },

    /// HTTP 403.
    #[error("forbidden: {}", FORBIDDEN)]
    Forbidden,

    /// HTTP 404.
    #[error("not found: {}", NOT_FOUND)]
    NotFound,

    /// HTTP 422.
    #[error("validation error: {message}")]
    Validation {
        /// Server-provided message, or a generic one.
        message: String,
    },

    /// HTTP 500.
    #[error("server error: {}", SERVER_ERROR)]
    Server,

    /// Any other non-success status.
    #[error("request failed ({status}): {message}")]
    Unknown {
        /// HTTP status code.
        status: u16,
        /// Server-provided message, or a generic one naming the status.
        message: String,
    },
}

impl ApiError {
    /// Builds the 422 variant, falling back to a generic message.
    #[must_use]
    pub fn validation(server_message: Option<String>) -> Self {
        Self::Validation {
            message: server_message.unwrap_or_else(|| INVALID_PARAMS.to_string()),
        }
    }

    /// Builds the catch-all variant, falling back to a message naming the status.
    #[must_use]
    pub fn unknown(status: u16, server_message: Option<String>) -> Self {
        Self::Unknown {
            status,
            message: server_message.unwrap_or_else(|| format!("Request failed ({status})")),
        }
    }

    /// User-facing message for this failure.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Network { .. } => NETWORK_FAILED,
            Self::AuthExpired { message } => message.as_deref().unwrap_or(AUTH_REQUIRED),
            Self::Forbidden => FORBIDDEN,
            Self::NotFound => NOT_FOUND,
            Self::Validation { message } | Self::Unknown { message, .. } => message.as_str(),
            Self::Server => SERVER_ERROR,
        }
    }

    /// HTTP status behind this failure, if a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Network { .. } => None,
            Self::AuthExpired { .. } => Some(401),
            Self::Forbidden => Some(403),
            Self::NotFound => Some(404),
            Self::Validation { .. } => Some(422),
            Self::Server => Some(500),
            Self::Unknown { status, .. } => Some(*status),
        }
    }

    /// Short name of the class, for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::AuthExpired { .. } => "auth_expired",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Validation { .. } => "validation",
            Self::Server => "server",
            Self::Unknown { .. } => "unknown",
        }
    }
}

/// Durable storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// IO error.
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but is not a valid key-value record.
    #[error("storage format error: {0}")]
    Format(String),

    /// No storage location could be determined.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Client error type.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A classified backend failure.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Durable storage failure.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// JSON error (response payload or snapshot).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client construction error.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The backend answered with success but an unusable payload.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// A newer login or a logout completed while this login was in flight.
    #[error("login superseded by a newer session change")]
    Superseded,
}

impl ClientError {
    /// Returns the classified backend failure, if this is one.
    #[must_use]
    pub const fn api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }

    /// Checks if the backend rejected the credential.
    #[must_use]
    pub const fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Api(ApiError::AuthExpired { .. }))
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
