//! Session store.
//!
//! Owns the single in-memory [`Session`] of the client process and its
//! durable snapshot. All mutations go through [`SessionStore`]; each one is
//! applied under one lock together with its durable write and then published
//! to subscribers, so no half-applied state (token set but not yet
//! authenticated, say) is ever observable.
//!
//! ## Overlapping logins
//!
//! Every `login` takes a generation number when it is issued, and `logout`
//! advances the generation too. When a login response arrives, it is applied
//! only if its generation is still the current one; otherwise it is dropped
//! and the caller gets [`ClientError::Superseded`]. The latest-issued attempt
//! therefore wins, regardless of the order responses arrive in.
//!
//! `is_loading` stays set while any login or registration is in flight,
//! superseded ones included.

use std::sync::Arc;

use parking_lot::Mutex;
use sd_model::{LoginRequest, LoginResponse, RegisterRequest, User};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::notify::{Navigator, NoticeLevel, Notifier, Redirect};
use crate::storage::{DurableStorage, SESSION_KEY, TOKEN_KEY};

const LOGIN_PATH: &str = "/auth/login";
const REGISTER_PATH: &str = "/auth/register";

/// Current authenticated identity and credential.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Authenticated account.
    pub user: Option<User>,
    /// Bearer credential.
    pub token: Option<String>,
    /// Whether the session is considered logged in.
    ///
    /// Implies `token.is_some()`. A stale token may still be marked
    /// authenticated until a call is rejected with 401.
    pub is_authenticated: bool,
    /// A login or registration call is in flight.
    pub is_loading: bool,
}

impl Session {
    /// Whether a credential is held, authenticated or not.
    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.is_authenticated || self.token.is_some()
    }

    fn logged_out(is_loading: bool) -> Self {
        Self {
            is_loading,
            ..Self::default()
        }
    }
}

/// Persisted subset of a [`Session`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Authenticated account.
    #[serde(default)]
    pub user: Option<User>,
    /// Bearer credential.
    #[serde(default)]
    pub token: Option<String>,
    /// Authentication flag at the time of writing.
    #[serde(default)]
    pub is_authenticated: bool,
}

impl SessionSnapshot {
    fn of(session: &Session) -> Self {
        Self {
            user: session.user.clone(),
            token: session.token.clone(),
            is_authenticated: session.is_authenticated,
        }
    }
}

struct Inner {
    session: Session,
    generation: u64,
    in_flight: u32,
}

impl Inner {
    fn begin(&mut self) {
        self.in_flight += 1;
        self.session.is_loading = true;
    }

    fn finish(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.session.is_loading = self.in_flight > 0;
    }
}

/// The process-wide session.
pub struct SessionStore {
    inner: Mutex<Inner>,
    storage: Arc<dyn DurableStorage>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    changes: watch::Sender<Session>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("SessionStore")
            .field("is_authenticated", &inner.session.is_authenticated)
            .field("is_loading", &inner.session.is_loading)
            .field("generation", &inner.generation)
            .field("in_flight", &inner.in_flight)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Creates an empty (logged out) store. Call [`Self::check_auth`] to rehydrate.
    #[must_use]
    pub fn new(
        storage: Arc<dyn DurableStorage>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (changes, _) = watch::channel(Session::default());
        Self {
            inner: Mutex::new(Inner {
                session: Session::default(),
                generation: 0,
                in_flight: 0,
            }),
            storage,
            notifier,
            navigator,
            changes,
        }
    }

    /// Copy of the current session.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.inner.lock().session.clone()
    }

    /// Whether the session is logged in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.lock().session.is_authenticated
    }

    /// The authenticated account, if any.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.inner.lock().session.user.clone()
    }

    /// Receives every published session change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.changes.subscribe()
    }

    pub(crate) fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    /// Credential to attach to an outbound request.
    ///
    /// Falls back to durable storage when the store holds no token, so calls
    /// made before rehydration still carry a persisted credential.
    pub(crate) fn credential(&self) -> Option<String> {
        if let Some(token) = self.inner.lock().session.token.clone() {
            return Some(token);
        }
        match self.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored credential");
                None
            }
        }
    }

    /// Exchanges credentials for a session.
    ///
    /// On success the session becomes authenticated and is persisted. On
    /// failure the previous session is left untouched and the classified
    /// error is returned (it has already been notified). A response without
    /// a usable token is a failure too.
    pub async fn login(&self, api: &ApiClient, credentials: &LoginRequest) -> ClientResult<()> {
        let generation = {
            let mut inner = self.inner.lock();
            inner.generation += 1;
            inner.begin();
            self.publish(&inner.session);
            inner.generation
        };
        tracing::debug!(generation, email = %credentials.email, "login issued");

        let result = api
            .post::<_, LoginResponse>(LOGIN_PATH, credentials)
            .await;

        let mut inner = self.inner.lock();
        inner.finish();
        if inner.generation != generation {
            tracing::debug!(
                generation,
                current = inner.generation,
                "discarding superseded login response"
            );
            self.publish(&inner.session);
            return Err(ClientError::Superseded);
        }

        let (token, user) = match result {
            Ok(LoginResponse { token, user }) if !token.trim().is_empty() => (token, user),
            Ok(_) => {
                tracing::warn!(generation, "login response carried no token");
                self.publish(&inner.session);
                return Err(ClientError::InvalidResponse(
                    "login response carried no token".to_string(),
                ));
            }
            Err(e) => {
                self.publish(&inner.session);
                return Err(e);
            }
        };

        let session = Session {
            user: Some(user),
            token: Some(token),
            is_authenticated: true,
            is_loading: inner.session.is_loading,
        };
        if let Err(e) = self.persist(&SessionSnapshot::of(&session)) {
            self.publish(&inner.session);
            return Err(e);
        }
        inner.session = session;
        self.publish(&inner.session);
        let user_id = inner.session.user.as_ref().map(|u| u.id);
        drop(inner);

        tracing::info!(generation, user_id = ?user_id, "logged in");
        self.notifier.notify(NoticeLevel::Success, "Logged in");
        Ok(())
    }

    /// Creates an account. Does not log in.
    pub async fn register(&self, api: &ApiClient, user_data: &RegisterRequest) -> ClientResult<()> {
        {
            let mut inner = self.inner.lock();
            inner.begin();
            self.publish(&inner.session);
        }

        let result = api
            .post::<_, serde_json::Value>(REGISTER_PATH, user_data)
            .await;

        {
            let mut inner = self.inner.lock();
            inner.finish();
            self.publish(&inner.session);
        }

        result?;
        tracing::info!(username = %user_data.username, "account registered");
        self.notifier
            .notify(NoticeLevel::Success, "Registration succeeded, please log in");
        Ok(())
    }

    /// Ends the session and navigates to the login view.
    ///
    /// Idempotent: without a session nothing is notified and no navigation
    /// happens, but durable storage is still left empty.
    pub fn logout(&self) {
        let had_session = {
            let mut inner = self.inner.lock();
            inner.generation += 1;
            let had_session = inner.session.has_credential();
            inner.session = Session::logged_out(inner.in_flight > 0);
            self.erase();
            self.publish(&inner.session);
            had_session
        };

        if had_session {
            tracing::info!("logged out");
            self.notifier.notify(NoticeLevel::Success, "Logged out");
            self.navigator.navigate(&Redirect::to_login(None));
        }
    }

    /// Rehydrates the session from durable storage.
    ///
    /// A snapshot holding both a token and a user is adopted as-is, without
    /// asking the backend. Anything else that is present (unparsable JSON,
    /// missing fields, a credential without a snapshot) is treated as
    /// corrupted: storage is cleared and the session stays logged out.
    pub fn check_auth(&self) {
        let mut inner = self.inner.lock();

        match self.read_snapshot() {
            Ok(None) => {}
            Ok(Some(SessionSnapshot {
                user: Some(user),
                token: Some(token),
                ..
            })) if !token.is_empty() => {
                if let Err(e) = self.storage.set(TOKEN_KEY, &token) {
                    tracing::warn!(error = %e, "could not resync stored credential");
                }
                inner.session = Session {
                    user: Some(user),
                    token: Some(token),
                    is_authenticated: true,
                    is_loading: inner.session.is_loading,
                };
                self.publish(&inner.session);
                tracing::debug!("session restored from storage");
            }
            Ok(Some(_)) => {
                tracing::warn!("stored session is incomplete, clearing it");
                self.reset_corrupted(&mut inner);
            }
            Err(reason) => {
                tracing::warn!(%reason, "stored session is unreadable, clearing it");
                self.reset_corrupted(&mut inner);
            }
        }
    }

    /// Replaces the account record and rewrites the snapshot.
    pub fn update_user(&self, user: User) -> ClientResult<()> {
        let mut inner = self.inner.lock();
        let mut session = inner.session.clone();
        session.user = Some(user);

        let snapshot = SessionSnapshot::of(&session);
        self.storage
            .set(SESSION_KEY, &serde_json::to_string(&snapshot)?)?;

        inner.session = session;
        self.publish(&inner.session);
        Ok(())
    }

    /// Forces a logout after the backend answered a request for `from` with 401.
    ///
    /// Any held credential is cleared, whichever token the rejected request
    /// carried. Returns true when a credential was cleared; when several
    /// rejections race, only the first finds one, so the login view is
    /// navigated to once.
    pub(crate) fn expire(&self, from: &str) -> bool {
        {
            let mut inner = self.inner.lock();
            let stored = self.storage.get(TOKEN_KEY).ok().flatten();
            if !inner.session.has_credential() && stored.is_none() {
                return false;
            }

            inner.session = Session::logged_out(inner.in_flight > 0);
            self.erase();
            self.publish(&inner.session);
        }

        tracing::info!(from, "credential rejected, session cleared");
        self.navigator.navigate(&Redirect::to_login(Some(from)));
        true
    }

    fn read_snapshot(&self) -> Result<Option<SessionSnapshot>, String> {
        let raw = self.storage.get(SESSION_KEY).map_err(|e| e.to_string())?;
        match raw {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| format!("invalid snapshot: {e}")),
            None => match self.storage.get(TOKEN_KEY).map_err(|e| e.to_string())? {
                Some(_) => Err("credential stored without a session snapshot".to_string()),
                None => Ok(None),
            },
        }
    }

    fn reset_corrupted(&self, inner: &mut Inner) {
        self.erase();
        if inner.session.has_credential() {
            inner.session = Session::logged_out(inner.session.is_loading);
            self.publish(&inner.session);
        }
    }

    fn persist(&self, snapshot: &SessionSnapshot) -> ClientResult<()> {
        self.storage
            .set(SESSION_KEY, &serde_json::to_string(snapshot)?)?;
        match &snapshot.token {
            Some(token) => self.storage.set(TOKEN_KEY, token)?,
            None => self.storage.remove(TOKEN_KEY)?,
        }
        Ok(())
    }

    fn erase(&self) {
        if let Err(e) = self.storage.clear() {
            tracing::warn!(error = %e, "could not clear durable storage");
        }
    }

    fn publish(&self, session: &Session) {
        self.changes.send_replace(session.clone());
    }
}
