//! Echo command - posts the given text back to the channel via the
//! deferred reply path.

use anyhow::bail;
use async_trait::async_trait;
use slash_commands::{CommandHandler, Reply, SlashCommandMetadata, SlashResponse};

pub const NAME: &str = "echo";
pub const HELP: &str = "Usage: /echo <text>\nPosts <text> to the channel.";

const ACK_TEXT: &str = "Working on it...";

pub struct EchoHandler;

impl EchoHandler {
    /// Create a new echo handler.
    pub fn new() -> Self {
        Self
    }
}

impl Default for EchoHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for EchoHandler {
    async fn execute(&self, metadata: &SlashCommandMetadata) -> anyhow::Result<Reply> {
        let text = metadata.text.trim().to_string();
        if text.is_empty() {
            bail!("Nothing to echo. {}", HELP);
        }

        Ok(Reply::later(
            async move { Ok::<_, anyhow::Error>(SlashResponse::channel(text)) },
            SlashResponse::user(ACK_TEXT),
            metadata.response_url.clone(),
        ))
    }
}
