//! Session wiring for terminal commands.
//!
//! A [`Console`] owns the process-wide session store, the API client bound to
//! it, and the terminal implementations of the presentation hooks.

use std::sync::Arc;

use sd_client::{
    ApiClient, DurableStorage, FileStorage, GuardDecision, HttpTransport, Navigator, NoticeLevel,
    Notifier, Redirect, RouteGuard, SessionStore, Transport,
};
use sd_model::LoginRequest;

use crate::cli::Cli;
use crate::config::{CliConfig, OutputFormat};
use crate::output::{error, info, prompt_password, prompt_required, success, warning};
use crate::{CliError, CliResult};

/// Prints notices to the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Success => success(message),
            NoticeLevel::Info => info(message),
            NoticeLevel::Warning => warning(message),
            NoticeLevel::Error => error(message),
        }
    }
}

/// Tells the user where the console is sending them.
///
/// A terminal has no views to tear down, so a navigation to login only
/// prints how to sign in again.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, redirect: &Redirect) {
        tracing::debug!(%redirect, "navigation requested");
        if redirect.is_login() {
            info("Run `sd login` to sign in.");
        }
    }
}

/// Session, client and output settings for one command run.
#[derive(Debug)]
pub struct Console {
    session: Arc<SessionStore>,
    api: ApiClient,
    format: OutputFormat,
}

impl Console {
    /// Builds a console from configuration and command-line overrides.
    pub fn open(config: &CliConfig, cli: &Cli) -> CliResult<Self> {
        let client_config = config.client_config(cli.server.as_deref())?;
        let session_path = config.session_path(cli.session_file.as_deref())?;
        tracing::debug!(
            server = %client_config.base_url,
            session = %session_path.display(),
            "opening console"
        );

        let transport = HttpTransport::new(&client_config)?;
        Ok(Self::with_parts(
            Arc::new(FileStorage::new(session_path)),
            Arc::new(transport),
            Arc::new(TerminalNotifier),
            Arc::new(TerminalNavigator),
            cli.output.unwrap_or(config.output_format),
        ))
    }

    /// Builds a console from explicit parts.
    #[must_use]
    pub fn with_parts(
        storage: Arc<dyn DurableStorage>,
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        format: OutputFormat,
    ) -> Self {
        let session = Arc::new(SessionStore::new(storage, notifier, navigator));
        let api = ApiClient::new(transport, Arc::clone(&session));
        Self {
            session,
            api,
            format,
        }
    }

    /// The session store.
    #[must_use]
    pub const fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// The API client.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Output format.
    #[must_use]
    pub const fn format(&self) -> OutputFormat {
        self.format
    }

    /// Rehydrates the session from storage.
    pub fn restore(&self) {
        self.session.check_auth();
    }

    /// Admits a protected command, prompting for credentials on the terminal
    /// when there is no session.
    pub async fn require_session(&self, requested: &str) -> CliResult<()> {
        self.require_session_with(requested, prompt_credentials).await
    }

    /// Admits a protected command.
    ///
    /// Mounts a route guard for `requested`. When it redirects to login,
    /// credentials are taken from `credentials`, the login is performed, and
    /// the guard is asked again, so the originally requested command resumes
    /// once the session exists.
    pub async fn require_session_with<F>(&self, requested: &str, credentials: F) -> CliResult<()>
    where
        F: FnOnce() -> CliResult<LoginRequest>,
    {
        let mut guard = RouteGuard::mount(Arc::clone(&self.session));
        guard.settled().await;

        match guard.evaluate(requested) {
            GuardDecision::Render => return Ok(()),
            GuardDecision::Redirect(redirect) => {
                let from = redirect.from.as_deref().unwrap_or(requested);
                info(&format!("Login required for {from}"));
            }
            GuardDecision::Loading => {}
        }

        let request = credentials()?;
        self.session.login(&self.api, &request).await?;

        guard.settled().await;
        match guard.evaluate(requested) {
            GuardDecision::Render => Ok(()),
            GuardDecision::Redirect(_) | GuardDecision::Loading => Err(CliError::NotAuthenticated),
        }
    }
}

/// Reads login credentials from the terminal.
pub fn prompt_credentials() -> CliResult<LoginRequest> {
    let email = prompt_required("Email: ")?;
    let password = prompt_password("Password: ")?;
    Ok(LoginRequest::new(email, password))
}
