//! Error types for the Colorama tool
//!
//! Every failure ends up as a human-readable message; none of them is
//! allowed to take the host session down.

use pymol_color::ColorError;
use thiserror::Error;

use crate::host::HostError;

/// Result type for tool commands and session events
pub type CmdResult<T = ()> = Result<T, CmdError>;

/// Errors that can occur while running a Colorama command or event
#[derive(Debug, Error)]
pub enum CmdError {
    /// Command parsing failed
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Command not found in registry
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Invalid argument provided
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },

    /// Missing required argument
    #[error("missing required argument: {0}")]
    MissingArgument(String),

    /// Bad mode, preset, bounds or bin count; nothing was colored
    #[error("{0}, nothing done")]
    Validation(#[from] ColorError),

    /// The selection matched no atoms
    #[error("no atoms selected: {0}")]
    EmptySelection(String),

    /// A host call failed
    #[error("host error: {0}")]
    Host(#[from] HostError),

    /// An event that needs an active selection arrived without one
    #[error("no active selection")]
    NoActiveSelection,
}

/// Errors that can occur during command parsing
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    /// Empty command
    #[error("empty command")]
    EmptyCommand,

    /// Unterminated string
    #[error("unterminated string starting at position {0}")]
    UnterminatedString(usize),

    /// Unbalanced parentheses
    #[error("unbalanced parentheses")]
    UnbalancedParens,

    /// Duplicate argument name
    #[error("duplicate argument: {0}")]
    DuplicateArgument(String),

    /// Generic parse error with message
    #[error("{0}")]
    Generic(String),
}

impl From<nom::Err<nom::error::Error<&str>>> for ParseError {
    fn from(err: nom::Err<nom::error::Error<&str>>) -> Self {
        match err {
            nom::Err::Incomplete(_) => ParseError::Generic("unexpected end of input".to_string()),
            nom::Err::Error(e) | nom::Err::Failure(e) => {
                let shown: String = e.input.chars().take(20).collect();
                ParseError::Generic(format!("at '{}...'", shown))
            }
        }
    }
}

impl CmdError {
    /// Create an invalid argument error
    pub fn invalid_arg(name: impl Into<String>, reason: impl Into<String>) -> Self {
        CmdError::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// True for failures that abort before any color reaches the host
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CmdError::Validation(_)
                | CmdError::InvalidArgument { .. }
                | CmdError::MissingArgument(_)
                | CmdError::EmptySelection(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CmdError::UnknownCommand("foo".to_string());
        assert_eq!(format!("{}", err), "unknown command: foo");

        let err = CmdError::from(ColorError::UnknownPreset("xyz".to_string()));
        assert_eq!(format!("{}", err), "unknown gradient: xyz, nothing done");
        assert!(err.is_validation());

        let err = CmdError::EmptySelection("none".to_string());
        assert_eq!(format!("{}", err), "no atoms selected: none");
    }

    #[test]
    fn test_parse_error() {
        let err = ParseError::UnterminatedString(5);
        assert_eq!(
            format!("{}", err),
            "unterminated string starting at position 5"
        );
    }
}
