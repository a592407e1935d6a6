//! Output formatting utilities.

use colored::Colorize;
use sd_model::{Book, Page, User};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::config::OutputFormat;
use crate::{CliError, CliResult};

/// Prints a success message.
pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Prints an error message.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Prints a warning message.
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

/// Prints an info message.
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// User row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct UserRow {
    /// User ID.
    #[tabled(rename = "ID")]
    pub id: u64,
    /// Username.
    #[tabled(rename = "Username")]
    pub username: String,
    /// Email address.
    #[tabled(rename = "Email")]
    pub email: String,
    /// Role.
    #[tabled(rename = "Role")]
    pub role: String,
    /// Creation date.
    #[tabled(rename = "Created")]
    pub created: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role_or_default().to_string(),
            created: user
                .created_at
                .map(|at| at.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Book row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct BookRow {
    /// Book ID.
    #[tabled(rename = "ID")]
    pub id: u64,
    /// Title.
    #[tabled(rename = "Title")]
    pub title: String,
    /// Author.
    #[tabled(rename = "Author")]
    pub author: String,
    /// ISBN.
    #[tabled(rename = "ISBN")]
    pub isbn: String,
}

impl From<&Book> for BookRow {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            isbn: book.isbn.clone(),
        }
    }
}

/// Outputs rows in the specified format.
///
/// In quiet mode only the first column (the ID) is printed, one per line.
pub fn output<T: Tabled + Serialize>(data: &[T], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Table => {
            if data.is_empty() {
                info("No results found.");
            } else {
                println!("{}", render_table(data));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(data)?),
        OutputFormat::Quiet => {
            for id in first_column(data) {
                println!("{id}");
            }
        }
    }
    Ok(())
}

/// Outputs one page of a listing, with a page footer in table mode.
pub fn output_page<T, R>(
    page: &Page<T>,
    query_page: u32,
    page_size: u32,
    format: OutputFormat,
) -> CliResult<()>
where
    R: Tabled + Serialize + for<'a> From<&'a T>,
    T: Serialize,
{
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(page)?),
        _ => {
            let rows: Vec<R> = page.items.iter().map(R::from).collect();
            output(&rows, format)?;
            if format == OutputFormat::Table && page.total > 0 {
                println!(
                    "Page {}/{} ({} total)",
                    query_page,
                    page.page_count(page_size),
                    page.total
                );
            }
        }
    }
    Ok(())
}

/// Outputs a single record.
pub fn output_single<T: Serialize>(item: &T, format: OutputFormat) -> CliResult<()> {
    let value = serde_json::to_value(item)?;
    match format {
        OutputFormat::Table => {
            for (key, field) in fields(&value) {
                println!("{:>12}: {}", key.bold(), field);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&value)?),
        OutputFormat::Quiet => {
            if let Some(id) = value.get("id") {
                println!("{id}");
            }
        }
    }
    Ok(())
}

fn render_table<T: Tabled>(data: &[T]) -> String {
    Table::new(data).with(Style::rounded()).to_string()
}

fn first_column<T: Tabled>(data: &[T]) -> Vec<String> {
    data.iter()
        .filter_map(|row| row.fields().into_iter().next())
        .map(|field| field.into_owned())
        .collect()
}

/// Top-level fields of a JSON object as display strings. Nulls are skipped.
fn fields(value: &serde_json::Value) -> Vec<(String, String)> {
    let Some(object) = value.as_object() else {
        return vec![(String::new(), value.to_string())];
    };

    object
        .iter()
        .filter(|(_, field)| !field.is_null())
        .map(|(key, field)| {
            let text = match field {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), text)
        })
        .collect()
}

/// Prompts for confirmation.
pub fn confirm(message: &str) -> CliResult<bool> {
    let answer = prompt(&format!("{message} [y/N]: "))?;
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

/// Prompts for a line of input, trimmed.
pub fn prompt(message: &str) -> CliResult<String> {
    print!("{message}");
    std::io::Write::flush(&mut std::io::stdout())?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Prompts for a non-empty line of input.
pub fn prompt_required(message: &str) -> CliResult<String> {
    let value = prompt(message)?;
    if value.is_empty() {
        return Err(CliError::Validation(format!(
            "{} is required",
            message.trim_end_matches([':', ' '])
        )));
    }
    Ok(value)
}

/// Prompts for password input (hidden).
pub fn prompt_password(prompt: &str) -> CliResult<String> {
    rpassword::prompt_password(prompt).map_err(CliError::Io)
}
