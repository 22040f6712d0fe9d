//! Dispatch Server - HTTP front end for slash commands.
//!
//! Receives slash-command webhooks, resolves the command by name and hands
//! the request to [`slash_commands::Dispatcher`]. Deferred replies are
//! posted back to the integration through [`response_client::ResponseClient`].

pub mod api;
pub mod commands;
pub mod config;
pub mod error;

pub use config::Config;
pub use error::ServerError;
