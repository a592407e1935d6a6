//! HTTP interceptor.
//!
//! [`ApiClient`] is the single choke point for backend calls. For every call
//! it attaches the session credential, sends the request through the
//! [`Transport`], and either decodes the payload or classifies the failure,
//! runs the side effect for its class, and returns it.
//!
//! | Outcome            | Class         | Side effect                           |
//! |--------------------|---------------|---------------------------------------|
//! | no response        | `Network`     | notify                                |
//! | 401                | `AuthExpired` | clear credential, logout, redirect    |
//! | 403                | `Forbidden`   | notify                                |
//! | 404                | `NotFound`    | notify                                |
//! | 422                | `Validation`  | notify server message                 |
//! | 500                | `Server`      | notify                                |
//! | anything else      | `Unknown`     | notify server message or status       |

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ApiError, ClientResult, SESSION_EXPIRED};
use crate::notify::NoticeLevel;
use crate::resources::{BooksApi, UsersApi};
use crate::session::SessionStore;
use crate::transport::{ApiRequest, Method, Transport};

/// Backend client bound to a session.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: Arc<SessionStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client sending through `transport` on behalf of `session`.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, session: Arc<SessionStore>) -> Self {
        Self { transport, session }
    }

    /// The session this client authenticates as.
    #[must_use]
    pub const fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// User endpoints.
    #[must_use]
    pub const fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }

    /// Book endpoints.
    #[must_use]
    pub const fn books(&self) -> BooksApi<'_> {
        BooksApi::new(self)
    }

    /// Makes a GET request.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.execute(Method::Get, path, None).await
    }

    /// Makes a POST request.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        self.execute(Method::Post, path, Some(body)).await
    }

    /// Makes a PUT request.
    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        self.execute(Method::Put, path, Some(body)).await
    }

    /// Makes a DELETE request, discarding any response body.
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.execute::<serde_json::Value>(Method::Delete, path, None)
            .await
            .map(|_| ())
    }

    /// Checks backend health.
    pub async fn health(&self) -> ClientResult<serde_json::Value> {
        self.get("/health").await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> ClientResult<T> {
        let bearer = self.session.credential();
        tracing::debug!(%method, path, authenticated = bearer.is_some(), "sending request");

        let request = ApiRequest {
            method,
            path: path.to_string(),
            body,
            bearer,
        };

        let error = match self.transport.send(request).await {
            Ok(response) if response.is_success() => return decode(&response.body),
            Ok(response) => classify(response.status, &response.body),
            Err(e) => ApiError::Network { detail: e.0 },
        };

        tracing::warn!(
            %method,
            path,
            kind = error.kind(),
            status = ?error.status(),
            "request failed: {}",
            match &error {
                ApiError::Network { detail } => detail.as_str(),
                other => other.message(),
            }
        );
        self.on_failure(&error, path);
        Err(error.into())
    }

    fn on_failure(&self, error: &ApiError, path: &str) {
        let message = match error {
            ApiError::AuthExpired { .. } if self.session.expire(path) => SESSION_EXPIRED,
            other => other.message(),
        };
        self.session.notifier().notify(NoticeLevel::Error, message);
    }
}

/// Maps a non-success status and its body to the failure taxonomy.
#[must_use]
pub fn classify(status: u16, body: &str) -> ApiError {
    match status {
        401 => ApiError::AuthExpired {
            message: server_message(body),
        },
        403 => ApiError::Forbidden,
        404 => ApiError::NotFound,
        422 => ApiError::validation(server_message(body)),
        500 => ApiError::Server,
        other => ApiError::unknown(other, server_message(body)),
    }
}

/// Extracts `error` (or else `message`) from a JSON object body.
fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;
    ["error", "message"]
        .iter()
        .filter_map(|key| object.get(*key).and_then(serde_json::Value::as_str))
        .map(str::trim)
        .find(|message| !message.is_empty())
        .map(str::to_string)
}

/// Decodes a success payload. An empty body decodes as JSON `null`.
fn decode<T: DeserializeOwned>(body: &str) -> ClientResult<T> {
    let body = body.trim();
    let value = if body.is_empty() {
        serde_json::from_value(serde_json::Value::Null)?
    } else {
        serde_json::from_str(body)?
    };
    Ok(value)
}
