//! Repos command - shows the project routing table.

use crate::config::RepoConfig;
use anyhow::bail;
use async_trait::async_trait;
use slash_commands::{CommandHandler, Reply, SlashCommandMetadata, SlashResponse};
use std::collections::BTreeMap;

pub const NAME: &str = "repos";
pub const HELP: &str = "Usage: /repos [project]\n\
Lists the repositories commands can act on, or shows a single project.";

const NONE_CONFIGURED: &str = "No repositories configured.";

pub struct ReposHandler {
    repos: BTreeMap<String, RepoConfig>,
}

impl ReposHandler {
    /// Create a new handler over the configured routing table.
    pub fn new(repos: BTreeMap<String, RepoConfig>) -> Self {
        Self { repos }
    }

    fn describe(key: &str, repo: &RepoConfig) -> String {
        format!("• {} → {} (base branch `{}`)", key, repo.full_name, repo.base_branch)
    }
}

#[async_trait]
impl CommandHandler for ReposHandler {
    async fn execute(&self, metadata: &SlashCommandMetadata) -> anyhow::Result<Reply> {
        let project = metadata.text.trim();

        if project.is_empty() {
            if self.repos.is_empty() {
                return Ok(Reply::now(SlashResponse::channel(NONE_CONFIGURED)));
            }

            let lines: Vec<String> = self
                .repos
                .iter()
                .map(|(key, repo)| Self::describe(key, repo))
                .collect();
            return Ok(Reply::now(SlashResponse::channel(format!(
                "*Repositories:*\n{}",
                lines.join("\n")
            ))));
        }

        match self.repos.get(project) {
            Some(repo) => Ok(Reply::now(SlashResponse::channel(Self::describe(
                project, repo,
            )))),
            None if self.repos.is_empty() => {
                bail!("Unknown project `{}`. {}", project, NONE_CONFIGURED)
            }
            None => {
                let known: Vec<&str> = self.repos.keys().map(|k| k.as_str()).collect();
                bail!(
                    "Unknown project `{}`. Known projects: {}",
                    project,
                    known.join(", ")
                )
            }
        }
    }
}
