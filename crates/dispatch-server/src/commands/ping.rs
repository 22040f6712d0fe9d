//! Ping command - liveness check from chat.

use async_trait::async_trait;
use slash_commands::{CommandHandler, Reply, SlashCommandMetadata, SlashResponse};

pub const NAME: &str = "ping";
pub const HELP: &str = "Usage: /ping\nReplies with `pong` if the dispatcher is up.";

pub struct PingHandler;

impl PingHandler {
    /// Create a new ping handler.
    pub fn new() -> Self {
        Self
    }
}

impl Default for PingHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for PingHandler {
    async fn execute(&self, _metadata: &SlashCommandMetadata) -> anyhow::Result<Reply> {
        Ok(Reply::now(SlashResponse::channel("pong")))
    }
}
