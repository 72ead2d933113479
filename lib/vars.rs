//! Bookkeeping for the named variables appearing in symbolic phases.
//!
//! Every variable referenced by any node's phase has exactly one entry here,
//! flagged as either Boolean-valued (constrained to {0, 1}) or parametric (a
//! free symbol). Variables are recorded in the order they are first seen so a
//! UI list can be appended to incrementally without re-scanning the graph.

use rustc_hash::FxHashMap;

/// Registry of named symbolic variables and their kinds.
///
/// New variables always start parametric; see [`register`][Self::register].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VarRegistry {
    kinds: FxHashMap<String, bool>,
    order: Vec<String>,
}

impl VarRegistry {
    /// Create an empty registry.
    pub fn new() -> Self { Self::default() }

    /// Record a variable, flagged parametric, if it is not already present.
    ///
    /// Returns `true` if the variable was newly created. Idempotent: a repeat
    /// registration never resets a previously set kind.
    pub fn register<S>(&mut self, name: S) -> bool
    where S: Into<String>
    {
        let name = name.into();
        if self.kinds.contains_key(&name) { return false; }
        self.kinds.insert(name.clone(), false);
        self.order.push(name);
        true
    }

    /// Set whether a variable is Boolean-valued.
    ///
    /// No-op if the variable has not been registered.
    pub fn set_kind(&mut self, name: &str, is_boolean: bool) {
        if let Some(kind) = self.kinds.get_mut(name) { *kind = is_boolean; }
    }

    /// Return whether a variable is Boolean-valued, if it is registered.
    pub fn is_boolean(&self, name: &str) -> Option<bool> {
        self.kinds.get(name).copied()
    }

    /// Return `true` if a variable is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    /// Remove a variable, returning `true` if it was present.
    ///
    /// Used to roll back variables introduced by an undone phase edit.
    pub fn remove(&mut self, name: &str) -> bool {
        if self.kinds.remove(name).is_none() { return false; }
        self.order.retain(|n| n != name);
        true
    }

    /// Return the number of registered variables.
    pub fn len(&self) -> usize { self.order.len() }

    /// Return `true` if no variables are registered.
    pub fn is_empty(&self) -> bool { self.order.is_empty() }

    /// Iterate over all `(name, is_boolean)` entries in the order they were
    /// first registered.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> + '_ {
        self.order.iter()
            .map(|name| (name.as_str(), self.kinds[name]))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn register_idempotent() {
        let mut reg = VarRegistry::new();
        assert!(reg.register("x"));
        assert!(!reg.register("x"));
        assert_eq!(reg.is_boolean("x"), Some(false));
        reg.set_kind("x", true);
        assert!(!reg.register("x"));
        assert_eq!(reg.is_boolean("x"), Some(true));
        assert_eq!(reg.is_boolean("y"), None);
    }

    #[test]
    fn ordering() {
        let mut reg = VarRegistry::new();
        reg.register("b");
        reg.register("a");
        reg.register("c");
        reg.set_kind("a", true);
        let entries: Vec<(&str, bool)> = reg.iter().collect();
        assert_eq!(entries, vec![("b", false), ("a", true), ("c", false)]);
    }

    #[test]
    fn remove() {
        let mut reg = VarRegistry::new();
        reg.register("x");
        reg.register("y");
        assert!(reg.remove("x"));
        assert!(!reg.remove("x"));
        assert!(!reg.contains("x"));
        assert_eq!(reg.len(), 1);
        let entries: Vec<(&str, bool)> = reg.iter().collect();
        assert_eq!(entries, vec![("y", false)]);
    }
}
