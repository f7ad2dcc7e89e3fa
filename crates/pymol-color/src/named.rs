//! Named color table
//!
//! Color ids are stable: removing a color never shifts the ids of the
//! colors registered after it. Freed ids are handed out again by later
//! definitions, so a remove-then-define cycle keeps the table size fixed.

use ahash::AHashMap;

use crate::error::{ColorError, ColorResult};
use crate::Color;

/// Registry of named colors addressed by name or by numeric id
#[derive(Debug, Clone)]
pub struct NamedColors {
    colors: Vec<Option<Color>>,
    by_name: AHashMap<String, u32>,
    free: Vec<u32>,
}

impl NamedColors {
    /// Create a table holding the basic palette
    pub fn new() -> Self {
        let mut table = Self::empty();
        for (name, color) in [
            ("white", Color::WHITE),
            ("black", Color::BLACK),
            ("red", Color::RED),
            ("green", Color::GREEN),
            ("blue", Color::BLUE),
            ("yellow", Color::new(1.0, 1.0, 0.0)),
            ("cyan", Color::new(0.0, 1.0, 1.0)),
            ("magenta", Color::new(1.0, 0.0, 1.0)),
            ("gray", Color::GRAY),
            ("orange", Color::new(1.0, 0.5, 0.0)),
            ("slate", Color::new(0.5, 0.5, 1.0)),
            ("salmon", Color::new(1.0, 0.6, 0.6)),
        ] {
            table.define(name, color);
        }
        table
    }

    /// Create a table with no colors
    pub fn empty() -> Self {
        NamedColors {
            colors: Vec::with_capacity(64),
            by_name: AHashMap::new(),
            free: Vec::new(),
        }
    }

    /// Define a color, redefining it in place if the name already exists
    pub fn define(&mut self, name: &str, color: Color) -> u32 {
        let key = name.to_lowercase();
        if let Some(&id) = self.by_name.get(&key) {
            self.colors[id as usize] = Some(color);
            return id;
        }
        let id = match self.free.pop() {
            Some(id) => {
                self.colors[id as usize] = Some(color);
                id
            }
            None => {
                self.colors.push(Some(color));
                (self.colors.len() - 1) as u32
            }
        };
        self.by_name.insert(key, id);
        id
    }

    /// Remove a color by name, returning its id
    pub fn remove(&mut self, name: &str) -> ColorResult<u32> {
        let id = self
            .by_name
            .remove(&name.to_lowercase())
            .ok_or_else(|| ColorError::NotFound(name.to_string()))?;
        self.colors[id as usize] = None;
        self.free.push(id);
        Ok(id)
    }

    pub fn get_by_name(&self, name: &str) -> Option<(u32, Color)> {
        let id = *self.by_name.get(&name.to_lowercase())?;
        self.get_by_id(id).map(|color| (id, color))
    }

    pub fn get_by_id(&self, id: u32) -> Option<Color> {
        self.colors.get(id as usize).copied().flatten()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(&name.to_lowercase())
    }

    /// One past the highest id ever handed out
    pub fn id_bound(&self) -> u32 {
        self.colors.len() as u32
    }

    /// Number of live colors
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// All live color names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for NamedColors {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_colors() {
        let colors = NamedColors::new();

        let (_, red) = colors.get_by_name("red").unwrap();
        assert_eq!(red, Color::RED);

        // Test case insensitivity
        let (_, red2) = colors.get_by_name("RED").unwrap();
        assert_eq!(red, red2);
    }

    #[test]
    fn test_redefine_keeps_id() {
        let mut colors = NamedColors::empty();
        let id = colors.define("mol_color", Color::RED);
        assert_eq!(colors.define("mol_color", Color::BLUE), id);
        assert_eq!(colors.get_by_id(id), Some(Color::BLUE));
        assert_eq!(colors.len(), 1);
    }

    #[test]
    fn test_remove_frees_name_not_ids() {
        let mut colors = NamedColors::empty();
        let a = colors.define("a", Color::RED);
        let b = colors.define("b", Color::GREEN);
        assert_eq!(colors.remove("a"), Ok(a));
        assert!(colors.remove("a").is_err());
        assert_eq!(colors.get_by_id(a), None);
        assert_eq!(colors.get_by_id(b), Some(Color::GREEN));
        assert_eq!(colors.names(), vec!["b"]);
    }

    #[test]
    fn test_remove_then_define_reuses_id() {
        let mut colors = NamedColors::new();
        let bound = colors.id_bound();
        let id = colors.define("prot_color", Color::RED);

        for _ in 0..50 {
            colors.remove("prot_color").unwrap();
            assert_eq!(colors.define("prot_color", Color::BLUE), id);
        }
        assert_eq!(colors.id_bound(), bound + 1);

        colors.remove("prot_color").unwrap();
        assert_eq!(colors.define("other", Color::GREEN), id);
        assert_eq!(colors.get_by_name("other"), Some((id, Color::GREEN)));
    }
}
