// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Triage session controller
//!
//! Owns the queue, the skip stack and the undo history. Front ends send
//! commands and render the [`Snapshot`] each command returns; they never
//! touch the working set directly.
//!
//! # Commands
//!
//! | Command      | Effect                                                   |
//! |--------------|----------------------------------------------------------|
//! | `classify`   | copy/move the current item into a bucket, push history  |
//! | `skip`       | move the current item onto the skip stack               |
//! | `go_back`    | put the last skipped item back where it left            |
//! | `undo`       | reverse the last classification                         |
//! | `reload`     | rescan; drops history and skip stack                    |

use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

use crate::classify;
use crate::config::{SessionConfig, TransferMode, BUCKET_COUNT, MIN_DESTINATIONS};
use crate::history::HistoryLog;
use crate::queue::TriageQueue;
use crate::scanner::{self, Item};
use crate::skip::SkipStack;
use crate::sorter::sort_items;
use crate::{Result, TriageError};

/// What the front end should display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No input folder configured yet
    NoInput,
    /// Input folder does not exist
    PathMissing,
    /// Nothing left (or nothing found) to triage
    NoItemsFound,
    /// Fewer than two buckets have a destination
    InsufficientDestinations,
    Ready,
}

impl SessionState {
    /// Inline message for the non-ready states
    pub fn message(&self, input: &str) -> Option<String> {
        match self {
            SessionState::NoInput => Some("Choose an input folder to start".to_string()),
            SessionState::PathMissing => Some(format!("Folder {} does not exist", input)),
            SessionState::NoItemsFound => Some(format!("Folder {} has no media files", input)),
            SessionState::InsufficientDestinations => Some(format!(
                "Choose at least {} destination folders",
                MIN_DESTINATIONS
            )),
            SessionState::Ready => None,
        }
    }
}

/// Read-only view of the session after a command
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub state: SessionState,
    pub queue_length: usize,
    pub cursor: usize,
    pub current: Option<Item>,
    /// Items waiting on the skip stack
    pub skipped: usize,
    /// Classifications that can be undone
    pub history: usize,
    pub mode: TransferMode,
    pub input: String,
}

impl fmt::Display for Snapshot {
    /// Status line: `3/10: name.jpg`, or the state message
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(message) = self.state.message(&self.input) {
            return f.write_str(&message);
        }
        match &self.current {
            Some(item) => write!(
                f,
                "{}/{}: {}",
                self.cursor + 1,
                self.queue_length,
                item.file_name()
            ),
            None => Ok(()),
        }
    }
}

pub struct SessionController {
    config: SessionConfig,
    queue: TriageQueue,
    skipped: SkipStack,
    history: HistoryLog,
}

impl SessionController {
    /// Create a controller and load the configured input folder
    pub fn new(config: SessionConfig) -> Self {
        let mut controller = Self {
            config,
            queue: TriageQueue::new(),
            skipped: SkipStack::new(),
            history: HistoryLog::new(),
        };
        controller.reload();
        controller
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn queue(&self) -> &TriageQueue {
        &self.queue
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn skipped(&self) -> &SkipStack {
        &self.skipped
    }

    /// Replace the settings, rescanning only when the scan would change
    pub fn configure(&mut self, config: SessionConfig) -> Snapshot {
        let rescan = self.config.scan_differs(&config);
        self.config = config;
        if rescan {
            self.reload()
        } else {
            debug!("Configuration changed without affecting the scan");
            self.snapshot()
        }
    }

    /// Rescan the input folder. History and skipped items are discarded.
    pub fn reload(&mut self) -> Snapshot {
        let items = match self.config.input_path() {
            Some(root) => {
                let mut items = scanner::scan(&root, self.config.include_subfolders);
                sort_items(&mut items, self.config.sort_method, self.config.reverse_sort);
                items
            }
            None => Vec::new(),
        };

        self.queue.load(items);
        self.skipped.clear();
        self.history.clear();
        info!(
            "Loaded {} items (sort: {}, reverse: {})",
            self.queue.len(),
            self.config.sort_method,
            self.config.reverse_sort
        );
        self.snapshot()
    }

    /// Copy or move the current item into a 1-based bucket
    pub fn classify(&mut self, bucket: usize) -> Result<Snapshot> {
        if bucket == 0 || bucket > BUCKET_COUNT {
            return Err(TriageError::InvalidBucket(bucket));
        }
        let configured = self.config.configured_destinations();
        if configured < MIN_DESTINATIONS {
            return Err(TriageError::InsufficientDestinations { configured });
        }

        let position = self.queue.cursor();
        let Some(item) = self.queue.current() else {
            return Ok(self.snapshot());
        };

        let destination = self.config.destination(bucket);
        let entry = classify::classify(
            item,
            position,
            bucket,
            destination.as_deref(),
            self.config.mode(),
        )?;

        self.queue.remove(position);
        self.history.push(entry);
        Ok(self.snapshot())
    }

    /// Defer the current item
    pub fn skip(&mut self) -> Snapshot {
        let position = self.queue.cursor();
        if let Some(item) = self.queue.remove(position) {
            debug!("Skipped {:?}", item.path);
            let from_end = position >= self.queue.len();
            if from_end {
                self.queue.seek(0);
            }
            self.skipped.push(item, from_end);
        }
        self.snapshot()
    }

    /// Bring back the most recently skipped item.
    ///
    /// It lands at the cursor, or back at the end of the queue when it was
    /// skipped from the last slot.
    pub fn go_back(&mut self) -> Snapshot {
        if let Some(skipped) = self.skipped.pop() {
            debug!("Recalled {:?}", skipped.item.path);
            let at = if skipped.from_end {
                self.queue.len()
            } else {
                self.queue.cursor()
            };
            self.queue.insert(skipped.item, at);
        }
        self.snapshot()
    }

    /// Reverse the last classification.
    ///
    /// The entry is consumed even when the file-system part fails.
    pub fn undo(&mut self) -> Result<Snapshot> {
        let Some(entry) = self.history.pop() else {
            return Ok(self.snapshot());
        };

        classify::revert(&entry)?;
        self.queue.insert(entry.item, entry.queue_position);
        Ok(self.snapshot())
    }

    /// Show the next item without changing the queue
    pub fn advance(&mut self) -> Snapshot {
        self.queue.advance();
        self.snapshot()
    }

    /// Show the previous item without changing the queue
    pub fn retreat(&mut self) -> Snapshot {
        self.queue.retreat();
        self.snapshot()
    }

    pub fn state(&self) -> SessionState {
        let Some(input) = self.config.input_path() else {
            return SessionState::NoInput;
        };
        if !input.exists() {
            SessionState::PathMissing
        } else if self.queue.is_empty() {
            SessionState::NoItemsFound
        } else if self.config.configured_destinations() < MIN_DESTINATIONS {
            SessionState::InsufficientDestinations
        } else {
            SessionState::Ready
        }
    }

    pub fn current(&self) -> Option<&Item> {
        self.queue.current()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state(),
            queue_length: self.queue.len(),
            cursor: self.queue.cursor(),
            current: self.queue.current().cloned(),
            skipped: self.skipped.len(),
            history: self.history.len(),
            mode: self.config.mode(),
            input: self.config.input_folder.clone(),
        }
    }
}
