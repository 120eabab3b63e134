//! Insertion-ordered route table
//!
//! Maps route patterns to arbitrary values (handlers, page components,
//! guards). Re-registering a pattern replaces its value in place, keeping its
//! original position.

use crate::pattern::RoutePattern;
use crate::Params;

#[derive(Debug, Clone)]
struct Entry<T> {
    pattern: RoutePattern,
    value: T,
}

/// Result of matching a path against a [`RouteTable`]
#[derive(Debug)]
pub struct RouteMatch<'a, T> {
    /// The registered pattern that matched
    pub pattern: &'a str,
    /// The value stored for that pattern
    pub value: &'a T,
    /// Decoded parameters; empty for exact matches
    pub params: Params,
}

#[derive(Debug, Clone)]
pub struct RouteTable<T> {
    entries: Vec<Entry<T>>,
}

impl<T> RouteTable<T> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Registers `pattern`. Returns the previous value if the pattern was
    /// already present.
    pub fn insert(&mut self, pattern: impl AsRef<str>, value: T) -> Option<T> {
        let pattern = pattern.as_ref();
        match self.entries.iter_mut().find(|e| e.pattern.as_str() == pattern) {
            Some(entry) => Some(std::mem::replace(&mut entry.value, value)),
            None => {
                self.entries.push(Entry {
                    pattern: RoutePattern::parse(pattern),
                    value,
                });
                None
            }
        }
    }

    /// Looks up a pattern by its literal text, without parameter matching
    pub fn get(&self, pattern: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|e| e.pattern.as_str() == pattern)
            .map(|e| &e.value)
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.get(pattern).is_some()
    }

    /// Resolves a request path: exact match first, then parameterized
    /// patterns in registration order.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch<'_, T>> {
        if let Some(entry) = self.entries.iter().find(|e| e.pattern.as_str() == path) {
            return Some(RouteMatch {
                pattern: entry.pattern.as_str(),
                value: &entry.value,
                params: Params::new(),
            });
        }

        self.entries
            .iter()
            .filter(|e| e.pattern.is_dynamic())
            .find_map(|entry| {
                entry.pattern.matches(path).map(|params| RouteMatch {
                    pattern: entry.pattern.as_str(),
                    value: &entry.value,
                    params,
                })
            })
    }

    /// Iterates `(pattern, value)` pairs in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|e| (e.pattern.as_str(), &e.value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for RouteTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
