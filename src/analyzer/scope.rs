use rustc_hash::FxHashSet;

/// Stack of declaration sets, innermost last. The bottom level is never
/// popped.
#[derive(Debug, Clone)]
pub struct Scope {
    levels: Vec<FxHashSet<String>>,
}

impl Scope {
    pub fn new() -> Self {
        Self {
            levels: vec![FxHashSet::default()],
        }
    }

    pub fn push(&mut self) {
        self.levels.push(FxHashSet::default());
    }

    pub fn pop(&mut self) {
        if self.levels.len() > 1 {
            self.levels.pop();
        }
    }

    /// Declares `name` in the innermost level. Returns `false` when that
    /// level already holds it.
    pub fn declare(&mut self, name: &str) -> bool {
        match self.levels.last_mut() {
            Some(level) => level.insert(name.to_string()),
            None => false,
        }
    }

    /// Visible from the innermost level outward.
    pub fn is_declared(&self, name: &str) -> bool {
        self.levels.iter().rev().any(|level| level.contains(name))
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}
