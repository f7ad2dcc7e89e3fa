//! Command trait and registry
//!
//! Defines the interface for commands and the registry that maps names to
//! implementations.

use std::sync::Arc;

use ahash::AHashMap;

use crate::args::ParsedCommand;
use crate::error::CmdResult;
use crate::host::ColorHost;
use crate::session::ColoramaSession;

/// Command execution context
///
/// Gives a command the host viewer and the tool session slot. The slot is
/// owned by the embedding application, one per open tool.
pub struct CommandContext<'a> {
    /// The host viewer
    pub host: &'a mut dyn ColorHost,
    /// The open tool, if any
    pub tool: &'a mut Option<ColoramaSession>,
    /// Whether to suppress output messages
    pub quiet: bool,
}

impl<'a> CommandContext<'a> {
    /// Create a new command context
    pub fn new(host: &'a mut dyn ColorHost, tool: &'a mut Option<ColoramaSession>) -> Self {
        Self {
            host,
            tool,
            quiet: false,
        }
    }

    /// Set the quiet flag
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Print a message (unless quiet mode is enabled)
    pub fn print(&self, msg: &str) {
        if !self.quiet {
            log::info!("{}", msg);
        }
    }
}

/// Trait for command implementations
pub trait Command: Send + Sync {
    /// Get the command name
    fn name(&self) -> &str;

    /// Execute the command
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &ParsedCommand) -> CmdResult;

    /// Get help text for this command
    fn help(&self) -> &str {
        "No help available."
    }

    /// Get list of command aliases
    fn aliases(&self) -> &[&str] {
        &[]
    }
}

/// Registry mapping command names to implementations
pub struct CommandRegistry {
    /// Commands indexed by name
    commands: AHashMap<String, Arc<dyn Command>>,
    /// Aliases mapping alias -> command name
    aliases: AHashMap<String, String>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            commands: AHashMap::new(),
            aliases: AHashMap::new(),
        }
    }

    /// Create a registry with the Colorama commands registered
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::commands::register_all(&mut registry);
        registry
    }

    /// Register a command and its aliases
    pub fn register<C: Command + 'static>(&mut self, cmd: C) {
        let name = cmd.name().to_string();
        for alias in cmd.aliases() {
            self.aliases.insert(alias.to_string(), name.clone());
        }
        self.commands.insert(name, Arc::new(cmd));
    }

    /// Look up a command by name or alias
    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        if let Some(cmd) = self.commands.get(name) {
            return Some(cmd.clone());
        }

        self.aliases
            .get(name)
            .and_then(|real_name| self.commands.get(real_name))
            .cloned()
    }

    /// Check if a command exists
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name) || self.aliases.contains_key(name)
    }

    /// Get all command names (not including aliases), sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.names())
            .finish()
    }
}
