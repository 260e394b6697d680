// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Items deferred by the operator, recalled newest first

use crate::scanner::Item;

/// A deferred item and where it left the queue
#[derive(Debug, Clone)]
pub struct Skipped {
    pub item: Item,
    /// Skipped from the last slot, so the cursor wrapped to the start
    pub from_end: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SkipStack {
    items: Vec<Skipped>,
}

impl SkipStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: Item, from_end: bool) {
        self.items.push(Skipped { item, from_end });
    }

    pub fn pop(&mut self) -> Option<Skipped> {
        self.items.pop()
    }

    /// Next item `pop` would return
    pub fn peek(&self) -> Option<&Item> {
        self.items.last().map(|s| &s.item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::MediaKind;
    use chrono::Utc;
    use std::path::PathBuf;

    fn item(name: &str) -> Item {
        Item {
            path: PathBuf::from(name),
            kind: MediaKind::Video,
            size: 0,
            modified: Utc::now(),
        }
    }

    #[test]
    fn test_lifo_order() {
        let mut stack = SkipStack::new();
        stack.push(item("a.mp4"), false);
        stack.push(item("b.mp4"), true);
        assert_eq!(stack.peek().unwrap().file_name(), "b.mp4");

        let top = stack.pop().unwrap();
        assert_eq!(top.item.file_name(), "b.mp4");
        assert!(top.from_end);
        let next = stack.pop().unwrap();
        assert_eq!(next.item.file_name(), "a.mp4");
        assert!(!next.from_end);
        assert!(stack.pop().is_none());
    }

    #[test]
    fn test_clear() {
        let mut stack = SkipStack::new();
        stack.push(item("a.mp4"), false);
        stack.clear();
        assert!(stack.is_empty());
        assert_eq!(stack.len(), 0);
    }
}
