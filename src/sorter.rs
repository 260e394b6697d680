// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Queue ordering
//!
//! Name sorts alphabetically by default. Time and size put the newest or
//! largest file first by default; `reverse` flips either direction.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::scanner::Item;
use crate::{Result, TriageError};

/// Field the queue is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    Time,
    Size,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Time => "time",
            SortKey::Size => "size",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "time" => Ok(SortKey::Time),
            "size" => Ok(SortKey::Size),
            other => Err(TriageError::Config(format!("Unknown sort method: {}", other))),
        }
    }
}

fn by_path(a: &Item, b: &Item) -> Ordering {
    a.path.as_os_str().cmp(b.path.as_os_str())
}

/// Sort items in place
pub fn sort_items(items: &mut [Item], key: SortKey, reverse: bool) {
    match key {
        SortKey::Name => {
            items.sort_by(|a, b| {
                let ord = by_path(a, b);
                if reverse { ord.reverse() } else { ord }
            });
        }
        SortKey::Time => {
            items.sort_by(|a, b| {
                let ord = b.modified.cmp(&a.modified);
                let ord = if reverse { ord.reverse() } else { ord };
                ord.then_with(|| by_path(a, b))
            });
        }
        SortKey::Size => {
            items.sort_by(|a, b| {
                let ord = b.size.cmp(&a.size);
                let ord = if reverse { ord.reverse() } else { ord };
                ord.then_with(|| by_path(a, b))
            });
        }
    }
}
