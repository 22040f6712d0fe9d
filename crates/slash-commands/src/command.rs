//! Command descriptors and the handler trait.

use crate::types::{SlashCommandMetadata, SlashResponse};
use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// A reply that resolves after the synchronous request has returned.
pub type PendingResponse = BoxFuture<'static, anyhow::Result<SlashResponse>>;

/// Outcome of a successful command execution.
pub enum Reply {
    /// Send this reply as the HTTP response.
    Immediate(SlashResponse),

    /// Acknowledge now, post the real reply to the callback URL later.
    Deferred(DeferredReply),
}

impl Reply {
    /// Reply right away.
    pub fn now(response: SlashResponse) -> Self {
        Self::Immediate(response)
    }

    /// Return `ack` to the caller and deliver `pending` to `response_url`
    /// once it resolves.
    pub fn later<F>(pending: F, ack: SlashResponse, response_url: impl Into<String>) -> Self
    where
        F: Future<Output = anyhow::Result<SlashResponse>> + Send + 'static,
    {
        Self::Deferred(DeferredReply {
            ack,
            pending: pending.boxed(),
            response_url: response_url.into(),
        })
    }
}

impl From<SlashResponse> for Reply {
    fn from(response: SlashResponse) -> Self {
        Self::Immediate(response)
    }
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Immediate(response) => f.debug_tuple("Immediate").field(response).finish(),
            Self::Deferred(deferred) => f.debug_tuple("Deferred").field(deferred).finish(),
        }
    }
}

/// A reply whose real content is still being computed.
pub struct DeferredReply {
    /// Placeholder returned synchronously
    pub ack: SlashResponse,
    /// Computation producing the real reply
    pub pending: PendingResponse,
    /// Where the real reply gets posted
    pub response_url: String,
}

impl fmt::Debug for DeferredReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredReply")
            .field("ack", &self.ack)
            .field("response_url", &self.response_url)
            .finish_non_exhaustive()
    }
}

/// Executable behavior behind a command.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Run the command for an authenticated, authorized request.
    async fn execute(&self, metadata: &SlashCommandMetadata) -> anyhow::Result<Reply>;
}

/// A named, help-documented command with an optional channel allow-list.
#[derive(Clone)]
pub struct Command {
    name: String,
    help: String,
    allowed_channels: BTreeSet<String>,
    handler: Arc<dyn CommandHandler>,
}

impl Command {
    /// Create a command usable from any channel.
    pub fn new(
        name: impl Into<String>,
        help: impl Into<String>,
        handler: Arc<dyn CommandHandler>,
    ) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            allowed_channels: BTreeSet::new(),
            handler,
        }
    }

    /// Restrict the command to the given channels. An empty list leaves it
    /// unrestricted.
    pub fn allowed_in<I, S>(mut self, channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_channels = channels.into_iter().map(Into::into).collect();
        self
    }

    /// Get the command name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the usage text shown for `help`.
    pub fn help(&self) -> &str {
        &self.help
    }

    /// Get the channel allow-list. Empty means any channel.
    pub fn allowed_channels(&self) -> &BTreeSet<String> {
        &self.allowed_channels
    }

    /// Whether the command may be run from `channel`.
    pub fn allows_channel(&self, channel: &str) -> bool {
        self.allowed_channels.is_empty() || self.allowed_channels.contains(channel)
    }

    pub(crate) fn handler(&self) -> &dyn CommandHandler {
        self.handler.as_ref()
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("allowed_channels", &self.allowed_channels)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_command() -> Command {
        Command::new("release", "Usage: /release <app>", Arc::new(MockCommandHandler::new()))
    }

    #[test]
    fn test_unrestricted_command_allows_any_channel() {
        let command = noop_command();
        assert!(command.allowed_channels().is_empty());
        assert!(command.allows_channel("general"));
        assert!(command.allows_channel("releases"));
    }

    #[test]
    fn test_restricted_command() {
        let command = noop_command().allowed_in(["releases", "ios-builds"]);
        assert!(command.allows_channel("releases"));
        assert!(command.allows_channel("ios-builds"));
        assert!(!command.allows_channel("general"));
    }

    #[test]
    fn test_empty_allow_list_means_unrestricted() {
        let command = noop_command().allowed_in(Vec::<String>::new());
        assert!(command.allows_channel("anywhere"));
    }

    #[tokio::test]
    async fn test_deferred_reply_keeps_ack_and_url() {
        let reply = Reply::later(
            async { Ok::<_, anyhow::Error>(SlashResponse::channel("Released")) },
            SlashResponse::user("On it"),
            "https://hooks.example.com/1",
        );

        match reply {
            Reply::Deferred(deferred) => {
                assert_eq!(deferred.ack, SlashResponse::user("On it"));
                assert_eq!(deferred.response_url, "https://hooks.example.com/1");
                let resolved = deferred.pending.await.unwrap();
                assert_eq!(resolved.text, "Released");
            }
            Reply::Immediate(_) => panic!("expected deferred reply"),
        }
    }
}
