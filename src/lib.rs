// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Triage: keyboard-driven media sorting
//!
//! Walks a folder of images and videos one file at a time and copies or
//! moves each into one of three destination buckets, with skip, recall of
//! skipped files and undo of the last classification.

pub mod classify;
pub mod config;
pub mod error;
pub mod history;
pub mod launch;
pub mod queue;
pub mod scanner;
pub mod session;
pub mod skip;
pub mod sorter;
pub mod web;

pub use config::{SessionConfig, TransferMode};
pub use error::{Result, TriageError};
pub use scanner::{Item, MediaKind};
pub use session::{SessionController, SessionState, Snapshot};
pub use sorter::SortKey;
