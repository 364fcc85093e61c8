//! Command table for the shell.

use std::collections::{hash_map::Entry, HashMap};
use std::iter;

use tracing::warn;

use crate::cli::core::{CommandResult, ShellContext};

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

pub struct CommandEntry {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            aliases: &[],
            description,
            usage,
            handler,
        }
    }

    pub fn with_aliases(self, aliases: &'static [&'static str]) -> Self {
        Self { aliases, ..self }
    }

    /// Every name the entry answers to, canonical name first.
    pub fn all_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        iter::once(self.name).chain(self.aliases.iter().copied())
    }
}

/// Commands in registration order, addressable by name or alias.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    lookup: HashMap<&'static str, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A name that is already taken stays with its first owner. An entry
    /// left with no name of its own is dropped.
    pub fn register(&mut self, entry: CommandEntry) {
        let slot = self.entries.len();
        let mut claimed = false;
        for name in entry.all_names() {
            match self.lookup.entry(name) {
                Entry::Vacant(vacant) => {
                    vacant.insert(slot);
                    claimed = true;
                }
                Entry::Occupied(_) => warn!(command = name, "duplicate command name ignored"),
            }
        }
        if claimed {
            self.entries.push(entry);
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.lookup
            .get(name)
            .and_then(|&slot| self.entries.get(slot))
    }

    pub fn list(&self) -> impl Iterator<Item = &CommandEntry> + '_ {
        self.entries.iter()
    }

    /// Names and aliases, for completion and suggestions.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().flat_map(|entry| entry.all_names())
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.get(name).map(|entry| entry.handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
        Ok(())
    }

    #[test]
    fn aliases_resolve_to_the_canonical_entry() {
        let mut registry = CommandRegistry::new();
        registry.register(CommandEntry::new("add", "Add", "add", noop).with_aliases(&["submit"]));
        registry.register(CommandEntry::new("list", "List", "list", noop));

        assert_eq!(registry.get("submit").map(|entry| entry.name), Some("add"));
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["add", "submit", "list"]
        );
        assert_eq!(registry.list().count(), 2);
    }

    #[test]
    fn first_owner_keeps_a_contested_name() {
        let mut registry = CommandRegistry::new();
        registry.register(CommandEntry::new("list", "History", "list", noop));
        registry.register(CommandEntry::new("list", "Other", "list", noop));
        registry.register(CommandEntry::new("ls", "Short", "ls", noop).with_aliases(&["list"]));

        assert_eq!(registry.get("list").map(|entry| entry.description), Some("History"));
        assert_eq!(registry.get("ls").map(|entry| entry.description), Some("Short"));
        assert_eq!(registry.list().count(), 2);
    }
}
