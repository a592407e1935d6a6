//! Hooks into the presentation layer.
//!
//! The core never renders anything itself. It reports user-facing messages
//! through a [`Notifier`] and requests view changes through a [`Navigator`].

use std::fmt;

/// Path of the login view.
pub const LOGIN_PATH: &str = "/login";

/// Severity of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// An operation completed.
    Success,
    /// Neutral information.
    Info,
    /// Something the user should look at.
    Warning,
    /// A failed operation.
    Error,
}

/// Shows messages to the user.
pub trait Notifier: Send + Sync {
    /// Shows a message.
    fn notify(&self, level: NoticeLevel, message: &str);
}

/// A request to leave the current view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// Target path.
    pub to: String,
    /// Path the user originally asked for, to return to after login.
    pub from: Option<String>,
}

impl Redirect {
    /// Redirect to the login view, remembering `from`.
    #[must_use]
    pub fn to_login(from: Option<&str>) -> Self {
        Self {
            to: LOGIN_PATH.to_string(),
            from: from.map(str::to_string),
        }
    }

    /// Checks whether this redirect targets the login view.
    #[must_use]
    pub fn is_login(&self) -> bool {
        self.to == LOGIN_PATH
    }
}

impl fmt::Display for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.from {
            Some(from) => write!(f, "{} (from {from})", self.to),
            None => f.write_str(&self.to),
        }
    }
}

/// Performs full navigations, discarding any in-progress view state.
pub trait Navigator: Send + Sync {
    /// Navigates to the redirect target.
    fn navigate(&self, redirect: &Redirect);
}

/// Notifier that only emits `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Success | NoticeLevel::Info => tracing::info!("{}", message),
            NoticeLevel::Warning => tracing::warn!("{}", message),
            NoticeLevel::Error => tracing::error!("{}", message),
        }
    }
}

/// Navigator that only emits `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate(&self, redirect: &Redirect) {
        tracing::info!(to = %redirect.to, from = ?redirect.from, "navigation requested");
    }
}
