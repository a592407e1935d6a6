//! Profile commands.

use sd_model::UpdateProfileRequest;

use crate::cli::ProfileCommand;
use crate::output::{info, output_single, success, UserRow};
use crate::{CliResult, Console};

/// Runs a profile command.
pub async fn run_profile(cmd: ProfileCommand, console: &Console) -> CliResult<()> {
    match cmd {
        ProfileCommand::Show => {
            let user = console.api().users().me().await?;
            output_single(&UserRow::from(&user), console.format())
        }
        ProfileCommand::Update { username, email } => {
            let request = UpdateProfileRequest { username, email };
            if request.is_empty() {
                info("Nothing to update.");
                return Ok(());
            }

            let user = console.api().users().update_me(&request).await?;
            success("Profile updated");
            output_single(&UserRow::from(&user), console.format())
        }
    }
}
