//! User management commands.

use sd_model::{CreateUserRequest, PageQuery, UpdateUserRequest, UserQuery};

use crate::cli::UserCommand;
use crate::output::{output_page, output_single, prompt_password, success, UserRow};
use crate::{CliError, CliResult, Console};

use super::confirm_delete;

/// Runs a user command.
pub async fn run_user(cmd: UserCommand, console: &Console) -> CliResult<()> {
    let users = console.api().users();
    let format = console.format();

    match cmd {
        UserCommand::List {
            page,
            page_size,
            keyword,
        } => {
            let query = UserQuery {
                page: PageQuery::new(page, page_size),
                keyword,
            };
            let result = users.list(&query).await?;
            output_page::<_, UserRow>(&result, query.page.page, query.page.page_size, format)
        }
        UserCommand::Get { id } => {
            let user = users.get(id).await?;
            output_single(&UserRow::from(&user), format)
        }
        UserCommand::Create {
            username,
            email,
            password,
            role,
        } => {
            let password = match password {
                Some(password) => password,
                None => {
                    let password = prompt_password("Enter password: ")?;
                    if password != prompt_password("Confirm password: ")? {
                        return Err(CliError::Validation("Passwords do not match".to_string()));
                    }
                    password
                }
            };
            let request = CreateUserRequest {
                username,
                email,
                password,
                role,
            };

            let user = users.create(&request).await?;
            success(&format!("User '{}' created with ID {}", user.username, user.id));
            Ok(())
        }
        UserCommand::Update {
            id,
            username,
            email,
            password,
            role,
        } => {
            let request = UpdateUserRequest {
                username,
                email,
                password,
                role,
            };
            let user = users.update(id, &request).await?;
            success(&format!("User {id} updated"));
            output_single(&UserRow::from(&user), format)
        }
        UserCommand::Delete { id, force } => {
            if !confirm_delete(&format!("user {id}"), force)? {
                return Ok(());
            }
            users.delete(id).await?;
            success(&format!("User {id} deleted"));
            Ok(())
        }
    }
}
