//! Host viewer abstraction
//!
//! [`ColorHost`] is the narrow slice of the viewer that Colorama needs:
//! reading attribute values of a selection, looking up color triples,
//! and defining, applying and removing named colors. Viewers implement it
//! directly; tests and the demo use [`MemoryHost`].

mod memory;

pub use memory::{HostCall, MemAtom, MemoryHost};

use std::fmt;

use pymol_color::Color;
use thiserror::Error;

/// Result type for host calls
pub type HostResult<T> = Result<T, HostError>;

/// Errors reported by a host viewer
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HostError {
    /// The selection expression could not be evaluated
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    /// No color with this id or name
    #[error("no such color: {0}")]
    NoSuchColor(String),

    /// The object carries no per-atom or object-level color
    #[error("no color for: {0}")]
    NoColor(String),

    /// Anything else the host wants to report
    #[error("{0}")]
    Other(String),
}

/// Per-atom scalar attributes a gradient can run over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// Residue number
    ResidueIndex,
    /// Occupancy
    Occupancy,
    /// Temperature factor
    BFactor,
    /// Current color id
    Color,
}

impl Attribute {
    /// Parse the `item` keyword of `color_grad`
    ///
    /// `b` also means residue number, for scripts that stash residue numbers
    /// in the b column and pass `item=b`.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.trim().to_lowercase().as_str() {
            "resi" | "b" => Some(Attribute::ResidueIndex),
            "q" => Some(Attribute::Occupancy),
            "b_factor" => Some(Attribute::BFactor),
            "color" => Some(Attribute::Color),
            _ => None,
        }
    }

    /// Name used inside selection expressions
    pub fn keyword(&self) -> &'static str {
        match self {
            Attribute::ResidueIndex => "resi",
            Attribute::Occupancy => "q",
            Attribute::BFactor => "b",
            Attribute::Color => "color",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// The host viewer surface consumed by Colorama
pub trait ColorHost {
    /// Values of `attribute` for every atom in `selection`, in atom order
    fn list_attribute_values(&self, selection: &str, attribute: Attribute) -> HostResult<Vec<f64>>;

    /// RGB triple (floats in [0, 1]) of a color id
    fn get_color_triple(&self, color_id: u32) -> HostResult<Color>;

    /// Define or redefine a named color
    fn define_named_color(&mut self, name: &str, color: Color) -> HostResult<()>;

    /// Color every atom of `selection` with a named color
    fn apply_named_color(&mut self, name: &str, selection: &str) -> HostResult<()>;

    /// Remove a named color from the host's color table
    fn remove_named_color(&mut self, name: &str) -> HostResult<()>;

    /// Object-level color of a selection, for objects without atoms
    fn resolve_object_level_color(&self, selection: &str) -> HostResult<u32>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_keywords() {
        assert_eq!(Attribute::from_keyword("B"), Some(Attribute::ResidueIndex));
        assert_eq!(Attribute::from_keyword("q"), Some(Attribute::Occupancy));
        assert_eq!(Attribute::from_keyword("vdw"), None);
        assert_eq!(Attribute::BFactor.to_string(), "b");
    }
}
