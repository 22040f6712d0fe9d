//! Dispatch errors.

use crate::types::SlashResponse;
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors raised while building or querying a command registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Command name must not be empty")]
    EmptyName,

    #[error("Command registered twice: {0}")]
    DuplicateCommand(String),

    #[error("Unknown command: {0}")]
    NotFound(String),
}

/// Reasons a command invocation was turned away or failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Invalid token")]
    InvalidToken,

    #[error("This command can't be used in #{channel}. Allowed channels: {}", format_channels(.allowed))]
    InvalidChannel {
        channel: String,
        allowed: BTreeSet<String>,
    },

    #[error("{0}")]
    HandlerFailure(String),
}

impl DispatchError {
    /// Convert into the user-only reply shown to the requester.
    pub fn into_response(self) -> SlashResponse {
        SlashResponse::error(self.to_string())
    }
}

fn format_channels(channels: &BTreeSet<String>) -> String {
    channels
        .iter()
        .map(|c| format!("#{}", c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Failure to push a deferred reply to its callback URL.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Callback request failed: {0}")]
    Transport(String),

    #[error("Callback rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}
