use std::collections::HashMap;

/// Identifier bindings in first-assignment order.
///
/// Every entry holds a concrete value: a name is created by the assignment
/// that gives it one, and later assignments overwrite it in place.
#[derive(Debug, Default, Clone)]
pub struct VariableStore {
    entries: Vec<(String, i32)>,
    index: HashMap<String, usize>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<i32> {
        self.index.get(name).map(|&slot| self.entries[slot].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Bind `name` to `value`. Returns `true` if the name was new.
    pub fn assign(&mut self, name: &str, value: i32) -> bool {
        if let Some(&slot) = self.index.get(name) {
            self.entries[slot].1 = value;
            return false;
        }
        self.index.insert(name.to_string(), self.entries.len());
        self.entries.push((name.to_string(), value));
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
    }
}
