//! Command argument types
//!
//! `color_grad` takes PyMOL-style arguments: positional values in a fixed
//! order, or `name=value` pairs in any order.

use std::fmt;

/// A command argument value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ArgValue {
    /// String value (selection, preset name, mode, ...)
    String(String),
    /// Integer value
    Int(i64),
    /// Floating-point value
    Float(f64),
    /// No value (omitted optional argument)
    #[default]
    None,
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::String(s) => write!(f, "{}", s),
            ArgValue::Int(i) => write!(f, "{}", i),
            ArgValue::Float(n) => write!(f, "{}", n),
            ArgValue::None => Ok(()),
        }
    }
}

impl ArgValue {
    /// Type a raw token: integers, then floats, then plain strings
    pub fn from_token(token: &str) -> Self {
        if let Ok(i) = token.parse::<i64>() {
            ArgValue::Int(i)
        } else if let Ok(f) = token.parse::<f64>() {
            ArgValue::Float(f)
        } else {
            ArgValue::String(token.to_string())
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ArgValue::None)
    }

    /// Textual form of any value; selections such as `10` come back as text
    pub fn as_text(&self) -> Option<String> {
        match self {
            ArgValue::None => None,
            other => Some(other.to_string()),
        }
    }

    /// Try to get as an integer; whole floats are accepted
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ArgValue::Int(i) => Some(*i),
            ArgValue::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            ArgValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Try to get as a float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ArgValue::Float(f) => Some(*f),
            ArgValue::Int(i) => Some(*i as f64),
            ArgValue::String(s) => s.trim().parse().ok(),
            ArgValue::None => None,
        }
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        ArgValue::String(s.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(s: String) -> Self {
        ArgValue::String(s)
    }
}

impl From<i64> for ArgValue {
    fn from(i: i64) -> Self {
        ArgValue::Int(i)
    }
}

impl From<f64> for ArgValue {
    fn from(f: f64) -> Self {
        ArgValue::Float(f)
    }
}

/// A parsed command with its name and arguments
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCommand {
    /// The command name (e.g., "colorama", "color_grad")
    pub name: String,
    /// Arguments as (optional_name, value) pairs
    ///
    /// Positional arguments have `None` as the name.
    pub args: Vec<(Option<String>, ArgValue)>,
}

impl ParsedCommand {
    /// Create a new parsed command with no arguments
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Add a positional argument
    pub fn with_arg(mut self, value: impl Into<ArgValue>) -> Self {
        self.args.push((None, value.into()));
        self
    }

    /// Add a named argument
    pub fn with_named_arg(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.args.push((Some(name.into()), value.into()));
        self
    }

    /// Get the `index`-th positional argument (named ones are skipped)
    pub fn positional(&self, index: usize) -> Option<&ArgValue> {
        self.args
            .iter()
            .filter(|(name, _)| name.is_none())
            .nth(index)
            .map(|(_, v)| v)
    }

    /// Get a named argument by name
    pub fn get_named(&self, name: &str) -> Option<&ArgValue> {
        self.args
            .iter()
            .find(|(n, _)| n.as_deref() == Some(name))
            .map(|(_, v)| v)
    }

    /// Look an argument up by keyword first, then by position
    pub fn lookup(&self, name: &str, index: usize) -> Option<&ArgValue> {
        self.get_named(name)
            .or_else(|| self.positional(index))
            .filter(|v| !v.is_none())
    }

    /// Names of keyword arguments not in `known`
    pub fn unknown_names<'a>(&'a self, known: &[&str]) -> Vec<&'a str> {
        self.args
            .iter()
            .filter_map(|(name, _)| name.as_deref())
            .filter(|name| !known.contains(name))
            .collect()
    }

    pub fn positional_count(&self) -> usize {
        self.args.iter().filter(|(name, _)| name.is_none()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_value_conversions() {
        assert_eq!(ArgValue::from_token("42"), ArgValue::Int(42));
        assert_eq!(ArgValue::from_token("0.25"), ArgValue::Float(0.25));
        assert_eq!(ArgValue::from_token("bgr"), ArgValue::String("bgr".to_string()));

        assert_eq!(ArgValue::Float(3.0).as_int(), Some(3));
        assert_eq!(ArgValue::Float(3.5).as_int(), None);
        assert_eq!(ArgValue::Int(2).as_float(), Some(2.0));
        assert_eq!(ArgValue::Int(10).as_text(), Some("10".to_string()));
    }

    #[test]
    fn test_lookup_prefers_keyword() {
        let cmd = ParsedCommand::new("color_grad")
            .with_arg("prot")
            .with_named_arg("mode", "ramp")
            .with_arg("q");

        assert_eq!(cmd.positional(1), Some(&ArgValue::from("q")));
        assert_eq!(cmd.lookup("mode", 2), Some(&ArgValue::from("ramp")));
        assert_eq!(cmd.lookup("item", 1), Some(&ArgValue::from("q")));
        assert_eq!(cmd.lookup("gradient", 3), None);
        assert_eq!(cmd.unknown_names(&["mode"]), Vec::<&str>::new());
        assert_eq!(cmd.positional_count(), 2);
    }
}
