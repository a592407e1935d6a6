//! Session commands.

use sd_client::ClientError;
use sd_model::{LoginRequest, RegisterRequest};

use crate::output::{error, info, output_single, prompt_password, prompt_required, success, UserRow};
use crate::{CliError, CliResult, Console};

/// Logs in, prompting for whatever was not given.
pub async fn run_login(
    console: &Console,
    email: Option<String>,
    password: Option<String>,
) -> CliResult<()> {
    let email = match email {
        Some(email) => email,
        None => prompt_required("Email: ")?,
    };
    let password = match password {
        Some(password) => password,
        None => prompt_password("Password: ")?,
    };

    console
        .session()
        .login(console.api(), &LoginRequest::new(email, password))
        .await?;
    Ok(())
}

/// Creates an account. The session is left as it was.
pub async fn run_register(
    console: &Console,
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> CliResult<()> {
    let username = match username {
        Some(username) => username,
        None => prompt_required("Username: ")?,
    };
    let email = match email {
        Some(email) => email,
        None => prompt_required("Email: ")?,
    };
    let password = match password {
        Some(password) => password,
        None => {
            let password = prompt_password("Password: ")?;
            if password != prompt_password("Confirm password: ")? {
                return Err(CliError::Validation("Passwords do not match".to_string()));
            }
            password
        }
    };

    let request = RegisterRequest {
        username,
        email,
        password,
    };
    console.session().register(console.api(), &request).await?;
    Ok(())
}

/// Ends the session.
pub fn run_logout(console: &Console) {
    console.restore();
    if !console.session().snapshot().has_credential() {
        info("Not logged in.");
    }
    console.session().logout();
}

/// Shows the stored identity without contacting the backend.
pub fn run_whoami(console: &Console) -> CliResult<()> {
    console.restore();
    match console.session().user() {
        Some(user) => output_single(&UserRow::from(&user), console.format()),
        None => Err(CliError::NotAuthenticated),
    }
}

/// Checks backend health and reports the session state.
pub async fn run_status(console: &Console, server: &str) -> CliResult<()> {
    info(&format!("Checking server status at {server}..."));

    match console.api().health().await {
        Ok(health) => {
            success("Server is reachable");
            if let Some(status) = health.get("status").and_then(|v| v.as_str()) {
                println!("Status: {status}");
            }
        }
        Err(ClientError::Api(_)) => {}
        Err(e) => error(&format!("Server is not reachable: {e}")),
    }

    console.restore();
    match console.session().user() {
        Some(user) => println!("Session: logged in as {} <{}>", user.username, user.email),
        None => println!("Session: not logged in"),
    }
    Ok(())
}
