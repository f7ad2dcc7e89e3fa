//! Command executor
//!
//! Dispatches commands against a [`ColorHost`] and owns the open tool.

use crate::args::ParsedCommand;
use crate::command::{CommandContext, CommandRegistry};
use crate::error::{CmdError, CmdResult};
use crate::host::ColorHost;
use crate::parser::{parse_command, parse_commands};
use crate::session::ColoramaSession;

/// Command executor
///
/// Holds the registry and the tool session. At most one tool is open at a
/// time; `colorama` creates it and [`CommandExecutor::close_tool`] drops it.
pub struct CommandExecutor {
    /// Command registry
    registry: CommandRegistry,
    /// The open tool, if any
    tool: Option<ColoramaSession>,
    /// Whether to suppress informational output
    quiet: bool,
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor {
    /// Create a new executor with the Colorama commands registered
    pub fn new() -> Self {
        Self {
            registry: CommandRegistry::with_builtins(),
            tool: None,
            quiet: false,
        }
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Get a reference to the command registry
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Get a mutable reference to the command registry
    pub fn registry_mut(&mut self) -> &mut CommandRegistry {
        &mut self.registry
    }

    /// The open tool, if any
    pub fn tool(&self) -> Option<&ColoramaSession> {
        self.tool.as_ref()
    }

    pub fn tool_mut(&mut self) -> Option<&mut ColoramaSession> {
        self.tool.as_mut()
    }

    /// Close the tool, returning its final state
    pub fn close_tool(&mut self) -> Option<ColoramaSession> {
        let tool = self.tool.take();
        if tool.is_some() {
            log::info!("colorama: closed");
        }
        tool
    }

    /// Execute a single command string
    ///
    /// # Example
    /// ```
    /// use pymol_colorama::{CommandExecutor, MemoryHost};
    ///
    /// let mut host = MemoryHost::new();
    /// host.add_chain("prot", 1..=10, "green").unwrap();
    ///
    /// let mut executor = CommandExecutor::new();
    /// executor.do_(&mut host, "color_grad prot, gradient=rainbow").unwrap();
    /// assert_eq!(host.apply_count(), 11);
    /// ```
    pub fn do_(&mut self, host: &mut dyn ColorHost, cmd: &str) -> CmdResult {
        let cmd = cmd.trim();
        if cmd.is_empty() || cmd.starts_with('#') {
            return Ok(());
        }

        let parsed = parse_command(cmd)?;
        self.execute_parsed(host, &parsed)
    }

    /// Execute several commands (semicolon or newline separated)
    ///
    /// Stops at the first failing command; the failure is logged and returned.
    pub fn do_multi(&mut self, host: &mut dyn ColorHost, cmds: &str) -> CmdResult {
        let commands = parse_commands(cmds).map_err(|e| {
            log::error!("{}", e);
            CmdError::from(e)
        })?;

        for cmd in &commands {
            if let Err(e) = self.execute_parsed(host, cmd) {
                log::error!("{}: {}", format_command(cmd), e);
                return Err(e);
            }
        }

        Ok(())
    }

    /// Execute an already parsed command
    pub fn execute_parsed(&mut self, host: &mut dyn ColorHost, parsed: &ParsedCommand) -> CmdResult {
        let command = self
            .registry
            .get(&parsed.name)
            .ok_or_else(|| CmdError::UnknownCommand(parsed.name.clone()))?;

        let mut ctx = CommandContext::new(host, &mut self.tool).with_quiet(self.quiet);
        command.execute(&mut ctx, parsed)
    }
}

/// Format a parsed command back to a string (for error reports)
fn format_command(cmd: &ParsedCommand) -> String {
    let mut s = cmd.name.clone();

    for (i, (name, value)) in cmd.args.iter().enumerate() {
        if i == 0 {
            s.push(' ');
        } else {
            s.push_str(", ");
        }

        if let Some(name) = name {
            s.push_str(name);
            s.push('=');
        }

        s.push_str(&value.to_string());
    }

    s
}
