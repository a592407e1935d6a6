//! # sd-client
//!
//! Client-side session lifecycle for the Shelfdesk admin backend.
//!
//! This crate provides:
//! - A durable storage adapter for the bearer credential and session snapshot
//! - The session store (`login`, `register`, `logout`, `check_auth`, `update_user`)
//! - An HTTP interceptor that attaches the credential and classifies failures
//! - A route guard deciding between rendering, loading and redirecting to login
//! - Typed resource clients for users and books
//!
//! ## Wiring
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use sd_client::{
//!     ApiClient, ClientConfig, HttpTransport, MemoryStorage, SessionStore, TracingNavigator,
//!     TracingNotifier,
//! };
//!
//! # async fn run() -> sd_client::ClientResult<()> {
//! let session = Arc::new(SessionStore::new(
//!     Arc::new(MemoryStorage::new()),
//!     Arc::new(TracingNotifier),
//!     Arc::new(TracingNavigator),
//! ));
//! let transport = HttpTransport::new(&ClientConfig::default())?;
//! let api = ApiClient::new(Arc::new(transport), Arc::clone(&session));
//!
//! session
//!     .login(&api, &sd_model::LoginRequest::new("a@b.com", "secret"))
//!     .await?;
//! let me = api.users().me().await?;
//! # let _ = me;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod guard;
pub mod notify;
pub mod resources;
pub mod session;
pub mod storage;
pub mod transport;


pub use api::{classify, ApiClient};
pub use config::ClientConfig;
pub use error::{ApiError, ClientError, ClientResult, StorageError, StorageResult};
pub use guard::{GuardDecision, GuardState, RouteGuard};
pub use notify::{
    Navigator, NoticeLevel, Notifier, Redirect, TracingNavigator, TracingNotifier, LOGIN_PATH,
};
pub use resources::{BooksApi, UsersApi};
pub use session::{Session, SessionSnapshot, SessionStore};
pub use storage::{DurableStorage, FileStorage, MemoryStorage, SESSION_KEY, TOKEN_KEY};
pub use transport::{ApiRequest, HttpTransport, Method, RawResponse, Transport, TransportError};
