//! # sd-cli
//!
//! Terminal console for the Shelfdesk backend.
//!
//! This crate provides the `sd` command:
//! - Session commands (login, register, logout, whoami, status)
//! - Profile management for the signed-in user
//! - User and book management (list, get, create, update, delete)
//! - Local configuration (`~/.shelfdesk/config.toml`)
//!
//! Commands that need a session go through the route guard. When it
//! redirects to login, the console asks for credentials and then carries on
//! with the command that was originally requested.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod output;

pub use cli::Cli;
pub use config::CliConfig;
pub use console::Console;
pub use error::{CliError, CliResult};
