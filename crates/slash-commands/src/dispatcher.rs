//! Authenticated, channel-gated command execution.

use crate::command::{Command, Reply};
use crate::delivery::DeferredDelivery;
use crate::error::DispatchError;
use crate::types::{SlashCommandMetadata, SlashResponse};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument, warn};

/// Runs commands on behalf of the chat integration.
///
/// The verification token is stored using `SecretString` so it never shows
/// up in logs or debug output.
#[derive(Clone)]
pub struct Dispatcher {
    token: SecretString,
    delivery: DeferredDelivery,
}

impl Dispatcher {
    /// Create a dispatcher that accepts requests carrying `token`.
    pub fn new(token: impl Into<String>, delivery: DeferredDelivery) -> Self {
        Self {
            token: SecretString::new(token.into()),
            delivery,
        }
    }

    /// Check the token and the channel allow-list.
    pub fn authorize(
        &self,
        command: &Command,
        metadata: &SlashCommandMetadata,
    ) -> Result<(), DispatchError> {
        if metadata.token != *self.token.expose_secret() {
            return Err(DispatchError::InvalidToken);
        }

        if !command.allows_channel(&metadata.channel_name) {
            return Err(DispatchError::InvalidChannel {
                channel: metadata.channel_name.clone(),
                allowed: command.allowed_channels().clone(),
            });
        }

        Ok(())
    }

    /// Handle one invocation of `command`.
    ///
    /// Always produces a reply: rejections and handler failures become
    /// user-only messages. Deferred replies return their acknowledgment and
    /// continue in the background.
    #[instrument(skip_all, fields(command = %command.name(), channel = %metadata.channel_name))]
    pub async fn handle(&self, command: &Command, metadata: SlashCommandMetadata) -> SlashResponse {
        if let Err(e) = self.authorize(command, &metadata) {
            warn!("Rejected command: {}", e);
            return e.into_response();
        }

        if metadata.is_help_request() {
            debug!("Returning help text");
            return help_response(command);
        }

        match command.handler().execute(&metadata).await {
            Ok(Reply::Immediate(response)) => response,
            Ok(Reply::Deferred(deferred)) => {
                debug!("Deferring reply to {}", deferred.response_url);
                self.delivery
                    .reply_later(deferred.pending, deferred.ack, deferred.response_url)
            }
            Err(e) => {
                warn!("Command failed: {:#}", e);
                DispatchError::HandlerFailure(e.to_string()).into_response()
            }
        }
    }
}

fn help_response(command: &Command) -> SlashResponse {
    if command.help().trim().is_empty() {
        SlashResponse::channel(format!("No help available for /{}", command.name()))
    } else {
        SlashResponse::channel(command.help())
    }
}
