// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Ordered working set of pending files

use std::path::Path;

use crate::scanner::Item;

/// Pending items plus the position currently shown to the operator.
///
/// The cursor always indexes a valid item while the queue is non-empty and
/// sits at 0 otherwise.
#[derive(Debug, Clone, Default)]
pub struct TriageQueue {
    items: Vec<Item>,
    cursor: usize,
}

impl TriageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the content and rewind
    pub fn load(&mut self, items: Vec<Item>) {
        self.items = items;
        self.cursor = 0;
    }

    /// Item under the cursor
    pub fn current(&self) -> Option<&Item> {
        self.items.get(self.cursor)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn position_of(&self, path: &Path) -> Option<usize> {
        self.items.iter().position(|i| i.path == path)
    }

    /// Remove the item at `at`. A cursor left past the end moves to the new
    /// last item, so the operator sees the neighbour of what was removed.
    pub fn remove(&mut self, at: usize) -> Option<Item> {
        if at >= self.items.len() {
            return None;
        }
        let item = self.items.remove(at);
        if self.cursor >= self.items.len() {
            self.cursor = self.items.len().saturating_sub(1);
        }
        Some(item)
    }

    /// Insert at `at` (clamped to the end) and show the inserted item
    pub fn insert(&mut self, item: Item, at: usize) {
        let at = at.min(self.items.len());
        self.items.insert(at, item);
        self.cursor = at;
    }

    /// Move the cursor, clamped to the last item
    pub fn seek(&mut self, pos: usize) {
        self.cursor = pos.min(self.items.len().saturating_sub(1));
    }

    /// Step forward, wrapping to the first item
    pub fn advance(&mut self) {
        if !self.items.is_empty() {
            self.cursor = (self.cursor + 1) % self.items.len();
        }
    }

    /// Step back, wrapping to the last item
    pub fn retreat(&mut self) {
        if !self.items.is_empty() {
            self.cursor = self.cursor.checked_sub(1).unwrap_or(self.items.len() - 1);
        }
    }
}
