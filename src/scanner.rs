// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Media file discovery

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Kind of media a file holds, decided by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    /// Legacy vector animation (SWF)
    Flash,
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "tiff", "ico"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "wmv", "flv", "mkv"];
const FLASH_EXTENSIONS: &[&str] = &["swf"];

impl MediaKind {
    /// Classify a path by its extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        let matches = |list: &[&str]| list.iter().any(|e| e.eq_ignore_ascii_case(ext));

        if matches(IMAGE_EXTENSIONS) {
            Some(MediaKind::Image)
        } else if matches(VIDEO_EXTENSIONS) {
            Some(MediaKind::Video)
        } else if matches(FLASH_EXTENSIONS) {
            Some(MediaKind::Flash)
        } else {
            None
        }
    }

    /// Extensions belonging to this kind
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            MediaKind::Image => IMAGE_EXTENSIONS,
            MediaKind::Video => VIDEO_EXTENSIONS,
            MediaKind::Flash => FLASH_EXTENSIONS,
        }
    }

    /// Whether a viewer can display the file inline
    pub fn is_still(&self) -> bool {
        matches!(self, MediaKind::Image)
    }
}

/// A file pending triage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub path: PathBuf,
    pub kind: MediaKind,
    /// Size in bytes at scan time
    pub size: u64,
    /// Modification time at scan time
    pub modified: DateTime<Utc>,
}

impl Item {
    /// Build an item from a file on disk, `None` if it is not a supported
    /// media file or its metadata is unreadable.
    pub fn from_path(path: &Path) -> Option<Self> {
        let kind = MediaKind::from_path(path)?;
        let meta = match std::fs::metadata(path) {
            Ok(m) => m,
            Err(e) => {
                debug!("Skipping {:?}: {}", path, e);
                return None;
            }
        };
        if !meta.is_file() {
            return None;
        }
        let modified = DateTime::<Utc>::from(meta.modified().unwrap_or(UNIX_EPOCH));

        Some(Self {
            path: path.to_path_buf(),
            kind,
            size: meta.len(),
            modified,
        })
    }

    /// File name for display
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Collect supported media files under `root`.
///
/// A missing root yields an empty list; the session reports that as its own
/// state rather than an error.
pub fn scan(root: &Path, recursive: bool) -> Vec<Item> {
    if !root.is_dir() {
        warn!("Input folder {:?} does not exist or is not a directory", root);
        return Vec::new();
    }

    let items: Vec<Item> = if recursive {
        WalkDir::new(root)
            .min_depth(1)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(e) => Some(e),
                Err(e) => {
                    debug!("Walk error: {}", e);
                    None
                }
            })
            .filter(|e| !e.file_type().is_dir())
            .filter_map(|e| Item::from_path(e.path()))
            .collect()
    } else {
        match std::fs::read_dir(root) {
            Ok(entries) => entries
                .flatten()
                .filter_map(|e| Item::from_path(&e.path()))
                .collect(),
            Err(e) => {
                warn!("Cannot list {:?}: {}", root, e);
                Vec::new()
            }
        }
    };

    info!("Found {} media files in {:?}", items.len(), root);
    items
}
