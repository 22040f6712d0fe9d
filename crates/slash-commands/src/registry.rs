//! Immutable command registry.

use crate::command::Command;
use crate::error::RegistryError;
use std::collections::HashMap;

/// Lookup table from command name to command, fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Command>,
}

impl CommandRegistry {
    /// Build a registry from a complete set of commands.
    ///
    /// Fails on an empty name or on two commands sharing a name; nothing is
    /// ever overwritten.
    pub fn new(commands: impl IntoIterator<Item = Command>) -> Result<Self, RegistryError> {
        let mut map = HashMap::new();

        for command in commands {
            let name = normalize_name(command.name());
            if name.is_empty() {
                return Err(RegistryError::EmptyName);
            }
            if map.contains_key(name) {
                return Err(RegistryError::DuplicateCommand(name.to_string()));
            }
            map.insert(name.to_string(), command);
        }

        Ok(Self { commands: map })
    }

    /// Find a command by name. A leading `/` is ignored.
    pub fn lookup(&self, name: &str) -> Result<&Command, RegistryError> {
        let key = normalize_name(name);
        self.commands
            .get(key)
            .ok_or_else(|| RegistryError::NotFound(key.to_string()))
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Registered command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

fn normalize_name(name: &str) -> &str {
    name.trim().trim_start_matches('/')
}
