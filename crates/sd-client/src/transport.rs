//! Raw HTTP transport.
//!
//! The transport only moves bytes: it never classifies failures or touches
//! the session. That is the interceptor's job ([`crate::ApiClient`]).

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::ClientConfig;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET.
    Get,
    /// POST.
    Post,
    /// PUT.
    Put,
    /// DELETE.
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        })
    }
}

/// An outbound request, credential already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Method.
    pub method: Method,
    /// Path (and query string) relative to the base URL.
    pub path: String,
    /// JSON body.
    pub body: Option<serde_json::Value>,
    /// Bearer credential to attach.
    pub bearer: Option<String>,
}

/// A received response, any status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Body text.
    pub body: String,
}

impl RawResponse {
    /// Creates a response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Checks for a 2xx status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// No response was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Sends requests to the backend.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a request and returns whatever response arrived.
    ///
    /// Non-success statuses are `Ok`; only the absence of a response is `Err`.
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportError>;
}

/// [`Transport`] over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport for the configured backend.
    pub fn new(config: &ClientConfig) -> crate::ClientResult<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.normalized_base_url().to_string(),
        })
    }

    /// Gets the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(describe)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(describe)?;

        Ok(RawResponse { status, body })
    }
}

fn describe(error: reqwest::Error) -> TransportError {
    let reason = if error.is_timeout() {
        "request timed out"
    } else if error.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    TransportError(format!("{reason}: {error}"))
}
