//! Configuration for the dispatch server.

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Optional config file, looked up in the working directory without extension.
const CONFIG_FILE: &str = "dispatcher";

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Chat integration settings
    pub slack: SlackConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Deferred reply delivery
    #[serde(default)]
    pub callback: CallbackConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,

    /// Per-command settings, keyed by command name
    #[serde(default)]
    pub commands: HashMap<String, CommandConfig>,

    /// Project routing table, keyed by short project name (e.g. "ios")
    #[serde(default)]
    pub repos: BTreeMap<String, RepoConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlackConfig {
    /// Verification token sent with every slash command
    pub token: SecretString,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackConfig {
    /// HTTP timeout for posting deferred replies
    #[serde(default = "default_callback_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Global requests per minute (0 disables the limit)
    #[serde(default = "default_global_rpm")]
    pub global_per_minute: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommandConfig {
    /// Comma-separated channel names; empty means any channel
    #[serde(default)]
    pub allowed_channels: String,
}

impl CommandConfig {
    /// Parsed channel allow-list. A leading `#` is accepted.
    pub fn channels(&self) -> Vec<String> {
        self.allowed_channels
            .split(',')
            .map(|c| c.trim().trim_start_matches('#'))
            .filter(|c| !c.is_empty())
            .map(String::from)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoConfig {
    /// Repository in `owner/name` form
    pub full_name: String,

    /// Branch releases are cut from
    #[serde(default = "default_base_branch")]
    pub base_branch: String,
}

// Default implementations
impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl Default for CallbackConfig {
    fn default() -> Self {
        Self {
            timeout: default_callback_timeout(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            global_per_minute: default_global_rpm(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value functions
fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8080
}

fn default_callback_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_global_rpm() -> u32 {
    600
}

fn default_log_level() -> String {
    "info".into()
}

fn default_base_branch() -> String {
    "main".into()
}

impl Config {
    /// Load configuration from `dispatcher.toml` (if present) and environment
    /// variables, e.g. `SLACK__TOKEN`, `SERVER__PORT`,
    /// `COMMANDS__REPOS__ALLOWED_CHANNELS`, `REPOS__IOS__FULL_NAME`.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let builder = config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(false),
            );

        Self::from_builder(builder)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Channel allow-list configured for `command`, empty if unrestricted.
    pub fn allowed_channels(&self, command: &str) -> Vec<String> {
        self.commands
            .get(command)
            .map(CommandConfig::channels)
            .unwrap_or_default()
    }
}
