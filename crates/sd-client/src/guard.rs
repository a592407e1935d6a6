//! Route guard.
//!
//! Decides, for each navigation to a protected view, whether the view may
//! render. The guard reads the [`SessionStore`] once when it is mounted
//! (after asking it to rehydrate) and afterwards only when the store
//! publishes a change.

use std::sync::Arc;

use tokio::sync::watch;

use crate::notify::Redirect;
use crate::session::{Session, SessionStore};

/// Guard state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// Authentication status is not known yet, or a login is in flight.
    Checking,
    /// A session is held.
    Authenticated,
    /// No session is held.
    Unauthenticated,
}

impl GuardState {
    fn of(session: &Session) -> Self {
        if session.is_loading {
            Self::Checking
        } else if session.is_authenticated {
            Self::Authenticated
        } else {
            Self::Unauthenticated
        }
    }
}

/// What to show for a requested view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show a loading indicator and nothing else.
    Loading,
    /// Show the protected view.
    Render,
    /// Leave for the login view.
    Redirect(Redirect),
}

/// Gate in front of protected views.
#[derive(Debug)]
pub struct RouteGuard {
    session: Arc<SessionStore>,
    changes: watch::Receiver<Session>,
    state: GuardState,
}

impl RouteGuard {
    /// Mounts the guard: subscribes to the store and runs `check_auth` once.
    #[must_use]
    pub fn mount(session: Arc<SessionStore>) -> Self {
        let mut changes = session.subscribe();
        session.check_auth();
        let state = GuardState::of(&changes.borrow_and_update());
        tracing::debug!(?state, "route guard mounted");

        Self {
            session,
            changes,
            state,
        }
    }

    /// Current state, as of the last evaluation.
    #[must_use]
    pub const fn state(&self) -> GuardState {
        self.state
    }

    /// The store this guard reads.
    #[must_use]
    pub const fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Decides what to show for `requested`.
    pub fn evaluate(&mut self, requested: &str) -> GuardDecision {
        let changed = self.changes.has_changed().unwrap_or(false);
        if changed || self.state == GuardState::Checking {
            self.refresh();
        }

        match self.state {
            GuardState::Checking => GuardDecision::Loading,
            GuardState::Authenticated => GuardDecision::Render,
            GuardState::Unauthenticated => {
                GuardDecision::Redirect(Redirect::to_login(Some(requested)))
            }
        }
    }

    /// Waits until the guard leaves [`GuardState::Checking`].
    pub async fn settled(&mut self) -> GuardState {
        while self.state == GuardState::Checking {
            if self.changes.changed().await.is_err() {
                break;
            }
            self.refresh();
        }
        self.state
    }

    fn refresh(&mut self) {
        let state = GuardState::of(&self.changes.borrow_and_update());
        if state != self.state {
            tracing::debug!(from = ?self.state, to = ?state, "route guard state changed");
        }
        self.state = state;
    }
}
