//! Slash-command request and response types.

use serde::{Deserialize, Serialize};

/// Fallback text for error replies whose description is empty.
const GENERIC_ERROR_TEXT: &str = "Sorry, something went wrong.";

/// Metadata sent by the chat integration with every slash-command invocation.
///
/// Only the fields the dispatcher needs are decoded; anything else in the
/// form body is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashCommandMetadata {
    /// Verification token shared with the integration
    pub token: String,

    /// Name of the channel the command was typed in
    pub channel_name: String,

    /// Everything after the command name
    pub text: String,

    /// URL that accepts deferred replies for this invocation
    pub response_url: String,
}

impl SlashCommandMetadata {
    /// Whether the user asked for the command's usage text.
    pub fn is_help_request(&self) -> bool {
        self.text == "help"
    }
}

/// Who gets to see a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    /// Only the user who triggered the command
    #[serde(rename = "ephemeral")]
    User,

    /// Every member of the originating channel
    #[serde(rename = "in_channel")]
    Channel,
}

impl Default for Visibility {
    fn default() -> Self {
        Self::Channel
    }
}

/// A reply to a slash command.
///
/// Serializes to `{"text": ..., "response_type": "ephemeral" | "in_channel"}`,
/// which is both the synchronous HTTP response body and the body posted to
/// `response_url` for deferred replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashResponse {
    pub text: String,

    #[serde(rename = "response_type")]
    pub visibility: Visibility,
}

impl SlashResponse {
    /// Create a reply with explicit visibility.
    pub fn new(text: impl Into<String>, visibility: Visibility) -> Self {
        Self {
            text: text.into(),
            visibility,
        }
    }

    /// Reply visible to the whole channel.
    pub fn channel(text: impl Into<String>) -> Self {
        Self::new(text, Visibility::Channel)
    }

    /// Reply visible only to the requester.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Visibility::User)
    }

    /// Error reply. Always user-only and never empty.
    pub fn error(description: impl Into<String>) -> Self {
        let description = description.into();
        if description.trim().is_empty() {
            Self::user(GENERIC_ERROR_TEXT)
        } else {
            Self::user(description)
        }
    }

    /// Build the error reply for a failed command execution.
    pub fn from_failure(error: &anyhow::Error) -> Self {
        Self::error(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_wire_format() {
        let json = serde_json::to_value(SlashResponse::channel("Done")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"text": "Done", "response_type": "in_channel"})
        );

        let json = serde_json::to_value(SlashResponse::user("Nope")).unwrap();
        assert_eq!(json["response_type"], "ephemeral");
    }

    #[test]
    fn test_default_visibility_is_channel() {
        assert_eq!(Visibility::default(), Visibility::Channel);
    }

    #[test]
    fn test_error_response_is_user_only_and_non_empty() {
        let response = SlashResponse::error("Release failed");
        assert_eq!(response.visibility, Visibility::User);
        assert_eq!(response.text, "Release failed");

        let response = SlashResponse::error("  ");
        assert_eq!(response.visibility, Visibility::User);
        assert_eq!(response.text, GENERIC_ERROR_TEXT);
    }

    #[test]
    fn test_from_failure_uses_top_level_description() {
        let error = anyhow::anyhow!("connection refused").context("Jira is unreachable");
        let response = SlashResponse::from_failure(&error);
        assert_eq!(response.text, "Jira is unreachable");
        assert_eq!(response.visibility, Visibility::User);
    }

    #[test]
    fn test_metadata_ignores_extra_fields() {
        let metadata: SlashCommandMetadata = serde_json::from_value(serde_json::json!({
            "token": "secret",
            "team_id": "T123",
            "channel_name": "releases",
            "command": "/release",
            "text": "help",
            "response_url": "https://hooks.example.com/commands/1"
        }))
        .unwrap();

        assert_eq!(metadata.channel_name, "releases");
        assert!(metadata.is_help_request());
    }

    #[test]
    fn test_metadata_missing_field_is_rejected() {
        let result: Result<SlashCommandMetadata, _> = serde_json::from_value(serde_json::json!({
            "token": "secret",
            "channel_name": "releases",
            "text": ""
        }));
        assert!(result.is_err());
    }
}
