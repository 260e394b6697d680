// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! History management for undo support

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::config::TransferMode;
use crate::scanner::Item;

/// A single completed classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// The item as it left the queue; its path is where undo restores to
    pub item: Item,
    /// Where the file (or its copy) ended up
    pub produced_path: PathBuf,
    /// Cursor value when the item was classified
    pub queue_position: usize,
    pub mode: TransferMode,
}

impl HistoryEntry {
    pub fn restored_path(&self) -> &Path {
        &self.item.path
    }
}

/// Linear undo stack of classifications, lost on reload
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Take the most recent entry
    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.entries.pop()
    }

    /// All entries, oldest first
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Get the most recent N entries (newest first)
    pub fn recent(&self, count: usize) -> Vec<&HistoryEntry> {
        self.entries.iter().rev().take(count).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Create a new history entry
pub fn create_entry(
    item: Item,
    produced_path: PathBuf,
    queue_position: usize,
    mode: TransferMode,
) -> HistoryEntry {
    HistoryEntry {
        id: Uuid::new_v4().to_string(),
        timestamp: Utc::now(),
        item,
        produced_path,
        queue_position,
        mode,
    }
}
