//! CLI argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::OutputFormat;

/// Shelfdesk console: manage users and books from the terminal.
#[derive(Debug, Parser)]
#[command(name = "sd")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Backend base URL (overrides config).
    #[arg(short, long, global = true, env = "SD_SERVER_URL")]
    pub server: Option<String>,

    /// Session file (overrides config).
    #[arg(long, global = true, env = "SD_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    /// Output format (overrides config).
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in with email and password.
    Login {
        /// Email address (prompted if not given).
        #[arg(long)]
        email: Option<String>,

        /// Password (prompted if not given).
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account. Does not log in.
    Register {
        /// Username (prompted if not given).
        #[arg(long)]
        username: Option<String>,

        /// Email address (prompted if not given).
        #[arg(long)]
        email: Option<String>,

        /// Password (prompted if not given).
        #[arg(long)]
        password: Option<String>,
    },

    /// End the session.
    Logout,

    /// Show the stored session identity.
    Whoami,

    /// Check backend reachability and session state.
    Status,

    /// Signed-in user's profile.
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// User management commands.
    #[command(subcommand)]
    Users(UserCommand),

    /// Book management commands.
    #[command(subcommand)]
    Books(BookCommand),

    /// Configuration management.
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Command {
    /// Location of the view this command corresponds to.
    ///
    /// `None` for commands that do not need a session.
    #[must_use]
    pub const fn protected_path(&self) -> Option<&'static str> {
        match self {
            Self::Profile(_) => Some("/profile"),
            Self::Users(_) => Some("/users"),
            Self::Books(_) => Some("/books"),
            Self::Login { .. }
            | Self::Register { .. }
            | Self::Logout
            | Self::Whoami
            | Self::Status
            | Self::Config(_) => None,
        }
    }
}

/// Profile commands.
#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show the profile.
    Show,

    /// Update the profile.
    Update {
        /// New username.
        #[arg(long)]
        username: Option<String>,

        /// New email address.
        #[arg(long)]
        email: Option<String>,
    },
}

/// User commands.
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List users.
    List {
        /// Page number, starting at 1.
        #[arg(long, default_value = "1")]
        page: u32,

        /// Users per page.
        #[arg(long, default_value = "10")]
        page_size: u32,

        /// Search keyword.
        #[arg(long)]
        keyword: Option<String>,
    },

    /// Get user details.
    Get {
        /// User ID.
        id: u64,
    },

    /// Create a new user.
    Create {
        /// Username.
        username: String,

        /// Email address.
        #[arg(long)]
        email: String,

        /// Password (will prompt if not provided).
        #[arg(long)]
        password: Option<String>,

        /// Role name.
        #[arg(long)]
        role: Option<String>,
    },

    /// Update a user.
    Update {
        /// User ID.
        id: u64,

        /// New username.
        #[arg(long)]
        username: Option<String>,

        /// New email address.
        #[arg(long)]
        email: Option<String>,

        /// New password.
        #[arg(long)]
        password: Option<String>,

        /// New role.
        #[arg(long)]
        role: Option<String>,
    },

    /// Delete a user.
    Delete {
        /// User ID.
        id: u64,

        /// Skip confirmation.
        #[arg(long)]
        force: bool,
    },
}

/// Book commands.
#[derive(Debug, Subcommand)]
pub enum BookCommand {
    /// List books.
    List {
        /// Page number, starting at 1.
        #[arg(long, default_value = "1")]
        page: u32,

        /// Books per page.
        #[arg(long, default_value = "10")]
        page_size: u32,

        /// Filter by title.
        #[arg(long)]
        title: Option<String>,

        /// Filter by author.
        #[arg(long)]
        author: Option<String>,
    },

    /// Get book details.
    Get {
        /// Book ID.
        id: u64,
    },

    /// Look a book up by ISBN.
    Isbn {
        /// ISBN.
        isbn: String,
    },

    /// Add a book.
    Create {
        /// Title.
        title: String,

        /// Author.
        #[arg(long)]
        author: String,

        /// ISBN.
        #[arg(long)]
        isbn: String,
    },

    /// Update a book. Fields not given keep their stored value.
    Update {
        /// Book ID.
        id: u64,

        /// New title.
        #[arg(long)]
        title: Option<String>,

        /// New author.
        #[arg(long)]
        author: Option<String>,

        /// New ISBN.
        #[arg(long)]
        isbn: Option<String>,
    },

    /// Delete a book.
    Delete {
        /// Book ID.
        id: u64,

        /// Skip confirmation.
        #[arg(long)]
        force: bool,
    },
}

/// Config commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,

    /// Set a configuration value.
    Set {
        /// Configuration key.
        key: String,
        /// Configuration value.
        value: String,
    },

    /// Initialize configuration interactively.
    Init,
}
