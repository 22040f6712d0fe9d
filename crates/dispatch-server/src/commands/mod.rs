//! Built-in slash commands.

mod echo;
mod ping;
mod repos;

pub use echo::EchoHandler;
pub use ping::PingHandler;
pub use repos::ReposHandler;

use crate::config::Config;
use slash_commands::Command;
use std::sync::Arc;

/// Build every built-in command, applying channel restrictions from config.
pub fn builtin_commands(config: &Config) -> Vec<Command> {
    vec![
        Command::new(ping::NAME, ping::HELP, Arc::new(PingHandler::new())),
        Command::new(echo::NAME, echo::HELP, Arc::new(EchoHandler::new())),
        Command::new(
            repos::NAME,
            repos::HELP,
            Arc::new(ReposHandler::new(config.repos.clone())),
        ),
    ]
    .into_iter()
    .map(|command| {
        let channels = config.allowed_channels(command.name());
        command.allowed_in(channels)
    })
    .collect()
}
