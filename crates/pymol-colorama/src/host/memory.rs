//! In-memory host for tests and the demo binary
//!
//! Understands just the selection expressions Colorama itself produces:
//! an object name (or `all`) followed by `and`/`&` clauses of the form
//! `name CA`, `resi = 3`, `q >= 0.5` or `b <= 20`.

use ahash::AHashMap;
use pymol_color::{Color, ColorError, NamedColors};

use super::{Attribute, ColorHost, HostError, HostResult};

/// One atom of the in-memory model
#[derive(Debug, Clone, PartialEq)]
pub struct MemAtom {
    pub object: String,
    pub name: String,
    pub resi: i64,
    pub q: f64,
    pub b: f64,
    /// Color id into the host's color table
    pub color: u32,
}

/// A recorded mutating host call
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Define(String, Color),
    Apply(String, String),
    Remove(String),
}

/// A [`ColorHost`] backed by plain vectors
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    atoms: Vec<MemAtom>,
    colors: NamedColors,
    object_colors: AHashMap<String, u32>,
    calls: Vec<HostCall>,
    fail_color_lookups: bool,
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Eq,
    Ge,
    Le,
}

#[derive(Debug, Clone)]
enum Clause {
    Name(String),
    Compare(Attribute, Op, f64),
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_atom(&mut self, atom: MemAtom) {
        self.atoms.push(atom);
    }

    /// Add one residue per number in `residues`, each with N, CA and C atoms
    /// colored `color`
    pub fn add_chain(
        &mut self,
        object: &str,
        residues: impl IntoIterator<Item = i64>,
        color: &str,
    ) -> HostResult<()> {
        let (id, _) = self
            .colors
            .get_by_name(color)
            .ok_or_else(|| HostError::NoSuchColor(color.to_string()))?;
        for resi in residues {
            for name in ["N", "CA", "C"] {
                self.atoms.push(MemAtom {
                    object: object.to_string(),
                    name: name.to_string(),
                    resi,
                    q: 1.0,
                    b: 20.0,
                    color: id,
                });
            }
        }
        Ok(())
    }

    /// Give an atom-less object (a map, a CGO) an object-level color
    pub fn set_object_color(&mut self, object: &str, color: &str) -> HostResult<()> {
        let (id, _) = self
            .colors
            .get_by_name(color)
            .ok_or_else(|| HostError::NoSuchColor(color.to_string()))?;
        self.object_colors.insert(object.to_string(), id);
        Ok(())
    }

    /// Recolor atoms directly, bypassing the call log
    pub fn paint(&mut self, selection: &str, color: &str) -> HostResult<()> {
        let (id, _) = self
            .colors
            .get_by_name(color)
            .ok_or_else(|| HostError::NoSuchColor(color.to_string()))?;
        for index in self.select(selection)? {
            self.atoms[index].color = id;
        }
        Ok(())
    }

    /// Make every `get_color_triple` call fail
    pub fn fail_color_lookups(&mut self, fail: bool) {
        self.fail_color_lookups = fail;
    }

    pub fn atoms(&self) -> &[MemAtom] {
        &self.atoms
    }

    pub fn colors(&self) -> &NamedColors {
        &self.colors
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Number of `apply_named_color` calls recorded
    pub fn apply_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, HostCall::Apply(..)))
            .count()
    }

    /// Current color of the first atom matching `selection`
    pub fn color_of(&self, selection: &str) -> Option<Color> {
        let index = *self.select(selection).ok()?.first()?;
        self.colors.get_by_id(self.atoms[index].color)
    }

    fn select(&self, selection: &str) -> HostResult<Vec<usize>> {
        let normalized = selection.replace(" & ", " and ");
        let mut parts = normalized.split(" and ").map(strip_parens);
        let object = parts
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| HostError::InvalidSelection(selection.to_string()))?;

        let clauses = parts
            .map(|part| parse_clause(part).ok_or_else(|| HostError::InvalidSelection(selection.to_string())))
            .collect::<HostResult<Vec<_>>>()?;

        let known = object == "all"
            || self.atoms.iter().any(|a| a.object == object)
            || self.object_colors.contains_key(object);
        if !known {
            return Err(HostError::InvalidSelection(selection.to_string()));
        }

        Ok(self
            .atoms
            .iter()
            .enumerate()
            .filter(|(_, atom)| object == "all" || atom.object == object)
            .filter(|(_, atom)| clauses.iter().all(|clause| clause_matches(clause, atom)))
            .map(|(index, _)| index)
            .collect())
    }
}

fn strip_parens(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .map(str::trim)
        .unwrap_or(s)
}

fn parse_clause(clause: &str) -> Option<Clause> {
    let tokens: Vec<&str> = clause.split_whitespace().collect();
    match tokens.as_slice() {
        ["name", name] => Some(Clause::Name(name.to_string())),
        [attr, op, value] => {
            let attribute = match *attr {
                "resi" => Attribute::ResidueIndex,
                "q" => Attribute::Occupancy,
                "b" => Attribute::BFactor,
                "color" => Attribute::Color,
                _ => return None,
            };
            let op = match *op {
                "=" => Op::Eq,
                ">=" => Op::Ge,
                "<=" => Op::Le,
                _ => return None,
            };
            Some(Clause::Compare(attribute, op, value.parse().ok()?))
        }
        _ => None,
    }
}

fn attribute_value(atom: &MemAtom, attribute: Attribute) -> f64 {
    match attribute {
        Attribute::ResidueIndex => atom.resi as f64,
        Attribute::Occupancy => atom.q,
        Attribute::BFactor => atom.b,
        Attribute::Color => atom.color as f64,
    }
}

fn clause_matches(clause: &Clause, atom: &MemAtom) -> bool {
    match clause {
        Clause::Name(name) => atom.name == *name,
        Clause::Compare(attribute, op, value) => {
            let actual = attribute_value(atom, *attribute);
            match op {
                Op::Eq => actual == *value,
                Op::Ge => actual >= *value,
                Op::Le => actual <= *value,
            }
        }
    }
}

impl ColorHost for MemoryHost {
    fn list_attribute_values(&self, selection: &str, attribute: Attribute) -> HostResult<Vec<f64>> {
        Ok(self
            .select(selection)?
            .into_iter()
            .map(|index| attribute_value(&self.atoms[index], attribute))
            .collect())
    }

    fn get_color_triple(&self, color_id: u32) -> HostResult<Color> {
        if self.fail_color_lookups {
            return Err(HostError::Other("color lookup disabled".to_string()));
        }
        self.colors
            .get_by_id(color_id)
            .ok_or_else(|| HostError::NoSuchColor(color_id.to_string()))
    }

    fn define_named_color(&mut self, name: &str, color: Color) -> HostResult<()> {
        self.calls.push(HostCall::Define(name.to_string(), color));
        self.colors.define(name, color);
        Ok(())
    }

    fn apply_named_color(&mut self, name: &str, selection: &str) -> HostResult<()> {
        self.calls
            .push(HostCall::Apply(name.to_string(), selection.to_string()));
        let (id, _) = self
            .colors
            .get_by_name(name)
            .ok_or_else(|| HostError::NoSuchColor(name.to_string()))?;
        for index in self.select(selection)? {
            self.atoms[index].color = id;
        }
        Ok(())
    }

    fn remove_named_color(&mut self, name: &str) -> HostResult<()> {
        self.calls.push(HostCall::Remove(name.to_string()));
        self.colors.remove(name).map(|_| ()).map_err(|err| match err {
            ColorError::NotFound(name) => HostError::NoSuchColor(name),
            other => HostError::Other(other.to_string()),
        })
    }

    fn resolve_object_level_color(&self, selection: &str) -> HostResult<u32> {
        self.object_colors
            .get(selection)
            .copied()
            .ok_or_else(|| HostError::NoColor(selection.to_string()))
    }
}
