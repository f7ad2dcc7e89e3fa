//! Colorama for PyMOL-RS
//!
//! An interactive RGB/HSV color editor for molecular selections, and the
//! `color_grad` command that colors a selection by binning an atom
//! attribute over a gradient.
//!
//! The viewer is reached only through the [`ColorHost`] trait. The crate
//! ships [`MemoryHost`], an in-memory implementation for tests and demos.
//!
//! # Example
//!
//! ```
//! use pymol_colorama::{CommandExecutor, MemoryHost};
//!
//! let mut host = MemoryHost::new();
//! host.add_chain("prot", 1..=10, "green").unwrap();
//!
//! let mut executor = CommandExecutor::new();
//! executor.do_multi(&mut host, "colorama prot; color_grad prot, gradient=bwr").unwrap();
//! assert!(executor.tool().is_some());
//! ```

pub mod args;
pub mod command;
pub mod commands;
pub mod error;
pub mod executor;
pub mod gradient;
pub mod host;
pub mod parser;
pub mod session;

pub use args::{ArgValue, ParsedCommand};
pub use command::{Command, CommandContext, CommandRegistry};
pub use error::{CmdError, CmdResult, ParseError};
pub use executor::CommandExecutor;
pub use gradient::{apply_gradient, AppliedBin, GradientOptions, GradientReport};
pub use host::{Attribute, ColorHost, HostCall, HostError, HostResult, MemAtom, MemoryHost};
pub use parser::{parse_command, parse_commands};
pub use session::{ColoramaSession, PaintMode, SelectionColorSnapshot, SessionState, Slot};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        apply_gradient, ColorHost, ColoramaSession, CommandExecutor, GradientOptions, MemoryHost,
        PaintMode, Slot,
    };
    pub use pymol_color::prelude::*;
}
