// SPDX-License-Identifier: MPL-2.0
//! Session-scoped stack of visited wallpapers.
//!
//! Entries are stored by source, not by position, so they survive catalog
//! reordering. A source removed from the catalog stays in the stack until
//! navigation reaches it and fails to resolve it.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    stack: Vec<String>,
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes `source` unless it is already on top. Returns whether it was
    /// pushed.
    pub fn push(&mut self, source: &str) -> bool {
        if self.top() == Some(source) {
            return false;
        }
        self.stack.push(source.to_string());
        true
    }

    pub fn pop(&mut self) -> Option<String> {
        self.stack.pop()
    }

    #[must_use]
    pub fn top(&self) -> Option<&str> {
        self.stack.last().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Whether going back would land on an earlier entry.
    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.stack.len() > 1
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }
}
