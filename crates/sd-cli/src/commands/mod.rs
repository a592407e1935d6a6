//! Command implementations.

pub mod auth;
pub mod book;
pub mod config;
pub mod profile;
pub mod user;

pub use auth::{run_login, run_logout, run_register, run_status, run_whoami};
pub use book::run_book;
pub use config::run_config;
pub use profile::run_profile;
pub use user::run_user;

use crate::CliResult;

/// Asks before deleting unless `force` is set. Returns false when declined.
fn confirm_delete(what: &str, force: bool) -> CliResult<bool> {
    if force || crate::output::confirm(&format!("Are you sure you want to delete {what}?"))? {
        return Ok(true);
    }
    crate::output::error("Operation cancelled");
    Ok(false)
}
