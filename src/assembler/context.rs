use derive_more::Constructor;
use log::{debug, trace};
use std::collections::{hash_map::Entry, HashMap};

pub type LabelName = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Constructor)]
pub struct Label {
    pub address: usize,
    pub line: usize,
}

#[derive(Debug, Default)]
pub struct LabelTable {
    labels: HashMap<LabelName, Label>,
}

impl LabelTable {
    /// Binds `name`, or returns the existing binding if there already was one. An
    /// existing binding is never overwritten.
    pub fn define(&mut self, name: &str, label: Label) -> Result<(), Label> {
        match self.labels.entry(name.to_owned()) {
            Entry::Occupied(o) => Err(*o.get()),
            Entry::Vacant(v) => {
                debug!("label '{}' bound to {} (line {})", name, label.address, label.line);
                v.insert(label);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<Label> {
        self.labels.get(name).copied()
    }

    pub fn address(&self, name: &str) -> Option<usize> {
        self.get(name).map(|label| label.address)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels ordered by address, then by definition line.
    pub fn sorted(&self) -> Vec<(&str, Label)> {
        let mut labels: Vec<_> = self
            .labels
            .iter()
            .map(|(name, label)| (name.as_str(), *label))
            .collect();
        labels.sort_by_key(|(_, label)| (label.address, label.line));
        labels
    }
}

/// User macros registered with `#define`. Redefinition replaces the old template.
#[derive(Debug, Default)]
pub struct MacroRegistry {
    user: HashMap<String, String>,
}

impl MacroRegistry {
    pub fn define(&mut self, name: &str, template: &str) {
        trace!("user macro '{}' := '{}'", name, template);
        self.user.insert(name.to_owned(), template.to_owned());
    }

    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.user.get(name).map(String::as_str)
    }
}

/// Everything a single assembly run accumulates. Nothing here outlives the run.
#[derive(Debug, Default)]
pub struct Context {
    pub labels: LabelTable,
    pub macros: MacroRegistry,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }
}
