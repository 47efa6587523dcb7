//! Command registry: every name and alias maps to its command.
//!
//! Uniqueness is enforced across names and aliases together. A colliding
//! registration is rejected before anything is inserted, so a failed
//! `register` leaves the registry exactly as it was.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::command::Command;
use crate::error::RegistryError;

/// Maps every command name and alias to an [`Arc<Command>`].
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Arc<Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command under its name and every alias.
    ///
    /// Fails without side effects when any of those is already taken.
    pub fn register(&mut self, command: Command) -> Result<Arc<Command>, RegistryError> {
        let command = Arc::new(command);
        let mut names = vec![command.name().to_string()];
        names.extend(command.aliases().iter().cloned());

        for name in &names {
            if self.commands.contains_key(name) {
                return Err(RegistryError::DuplicateName { name: name.clone() });
            }
        }

        debug!(command = command.name(), names = ?names, "registering command");
        for name in names {
            self.commands.insert(name, Arc::clone(&command));
        }
        Ok(command)
    }

    /// Removes the command known under `name` (canonical or alias),
    /// together with all of its other names. Returns the removed command.
    pub fn unregister(&mut self, name: &str) -> Option<Arc<Command>> {
        let command = self.commands.get(name).cloned()?;

        debug!(
            command = command.name(),
            aliases = ?command.aliases(),
            "unregistering command"
        );
        self.commands.remove(command.name());
        for alias in command.aliases() {
            self.commands.remove(alias);
        }
        Some(command)
    }

    /// Finds the command registered under `name` (canonical or alias).
    pub fn lookup(&self, name: &str) -> Option<Arc<Command>> {
        self.commands.get(name).cloned()
    }

    /// Every registered command once, regardless of alias count.
    pub fn commands(&self) -> Vec<Arc<Command>> {
        let mut unique: HashMap<&str, Arc<Command>> = HashMap::new();
        for command in self.commands.values() {
            unique
                .entry(command.name())
                .or_insert_with(|| Arc::clone(command));
        }
        unique.into_values().collect()
    }

    /// Number of distinct registered commands.
    pub fn len(&self) -> usize {
        self.commands().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Context;

    fn command(name: &str, aliases: &[&str]) -> Command {
        Command::builder(name, |_ctx: Context| async { Ok(()) })
            .aliases(aliases.iter().copied())
            .build()
            .unwrap()
    }

    #[test]
    fn test_register_and_lookup_by_any_name() {
        let mut registry = CommandRegistry::new();
        registry.register(command("greet", &["hello", "hi"])).unwrap();

        assert!(registry.lookup("greet").is_some());
        assert!(registry.lookup("hello").is_some());
        assert!(registry.lookup("hi").is_some());
        assert!(registry.lookup("nope").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_collision_is_rejected_without_side_effects() {
        let mut registry = CommandRegistry::new();
        registry.register(command("greet", &["hello"])).unwrap();

        // The second command collides only on an alias, and nothing of it
        // may land in the registry.
        let err = registry
            .register(command("wave", &["hello", "hey"]))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateName {
                name: "hello".into()
            }
        );
        assert!(registry.lookup("wave").is_none());
        assert!(registry.lookup("hey").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregister_removes_all_names() {
        let mut registry = CommandRegistry::new();
        registry.register(command("greet", &["hello"])).unwrap();

        let removed = registry.unregister("hello").unwrap();
        assert_eq!(removed.name(), "greet");
        assert!(registry.lookup("greet").is_none());
        assert!(registry.lookup("hello").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unregister_unknown_name() {
        let mut registry = CommandRegistry::new();
        assert!(registry.unregister("ghost").is_none());
    }

    #[test]
    fn test_commands_lists_each_once() {
        let mut registry = CommandRegistry::new();
        registry.register(command("a", &["a1", "a2"])).unwrap();
        registry.register(command("b", &[])).unwrap();

        let mut names: Vec<String> = registry
            .commands()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        names.sort();
        assert_eq!(names, ["a", "b"]);
    }
}
