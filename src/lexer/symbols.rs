use rustc_hash::FxHashMap;
use serde::{Serialize, Serializer};

use crate::token::TokenKind;

/// Records the first kind each distinct token text was classified as.
///
/// Entries are write-once: later sightings of the same text under another
/// kind do not overwrite the first classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    entries: FxHashMap<String, TokenKind>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, text: &str, kind: TokenKind) {
        if !self.entries.contains_key(text) {
            self.entries.insert(text.to_string(), kind);
        }
    }

    pub fn get(&self, text: &str) -> Option<TokenKind> {
        self.entries.get(text).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by text so output is stable across runs.
    pub fn entries(&self) -> Vec<(&str, TokenKind)> {
        let mut entries = self
            .entries
            .iter()
            .map(|(text, kind)| (text.as_str(), *kind))
            .collect::<Vec<_>>();
        entries.sort_by(|left, right| left.0.cmp(right.0));
        entries
    }
}

impl Serialize for SymbolTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries())
    }
}
