//! Packrat memoization caches for the Quick and Slow algorithms.
//!
//! Lookup erases the entry (consume-on-lookup: ownership of a cached
//! subtree transfers to the caller, not aliased), and the cache separately
//! tracks the farthest position any attempt reached, for error reporting.

use crate::ast::Ast;
use std::collections::HashMap;

/// Memoizes `(rule name, position) -> (subtree, tokens consumed)` for the
/// Quick algorithm.
#[derive(Default)]
pub struct QuickCache {
    entries: HashMap<(String, usize), (Ast, usize)>,
    max_fail_position: usize,
}

impl QuickCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rule: &str, position: usize, subtree: Ast, consumed: usize) {
        self.entries.insert((rule.to_string(), position), (subtree, consumed));
    }

    /// Consume-on-lookup: removes and returns the cached entry if present.
    pub fn take(&mut self, rule: &str, position: usize) -> Option<(Ast, usize)> {
        self.entries.remove(&(rule.to_string(), position))
    }

    pub fn note_fail_position(&mut self, position: usize) {
        if position > self.max_fail_position {
            self.max_fail_position = position;
        }
    }

    pub fn max_fail_position(&self) -> usize {
        self.max_fail_position
    }
}

/// Memoizes `(rule name, token range) -> subtree` for the Slow algorithm.
#[derive(Default)]
pub struct SlowCache {
    entries: HashMap<(String, usize, usize), Ast>,
    max_fail_position: usize,
}

impl SlowCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rule: &str, range: (usize, usize), subtree: Ast) {
        self.entries.insert((rule.to_string(), range.0, range.1), subtree);
    }

    pub fn take(&mut self, rule: &str, range: (usize, usize)) -> Option<Ast> {
        self.entries.remove(&(rule.to_string(), range.0, range.1))
    }

    pub fn note_fail_position(&mut self, position: usize) {
        if position > self.max_fail_position {
            self.max_fail_position = position;
        }
    }

    pub fn max_fail_position(&self) -> usize {
        self.max_fail_position
    }
}
