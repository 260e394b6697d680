// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Persisted session settings
//!
//! A flat JSON record holding only what is needed to resume a session:
//! the input folder, scan and sort options, the transfer mode and the
//! destination folder of each bucket.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::sorter::SortKey;
use crate::{Result, TriageError};

/// Number of destination buckets
pub const BUCKET_COUNT: usize = 3;

/// Minimum number of configured buckets before classification is allowed
pub const MIN_DESTINATIONS: usize = 2;

/// Default config file name
pub const DEFAULT_CONFIG_FILE: &str = "triage.json";

/// Whether classification duplicates or relocates the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferMode {
    Copy,
    Move,
}

impl TransferMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferMode::Copy => "copy",
            TransferMode::Move => "move",
        }
    }
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransferMode {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "copy" => Ok(TransferMode::Copy),
            "move" => Ok(TransferMode::Move),
            other => Err(TriageError::Config(format!("Unknown transfer mode: {}", other))),
        }
    }
}

/// Session settings, persisted between runs
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Folder holding the files to triage
    #[serde(default)]
    pub input_folder: String,

    /// Walk the whole subtree instead of direct children only
    #[serde(default, alias = "inc_subfolders")]
    pub include_subfolders: bool,

    #[serde(default)]
    pub sort_method: SortKey,

    #[serde(default)]
    pub reverse_sort: bool,

    /// true = copy, false = move
    #[serde(default = "default_true")]
    pub copy_mode: bool,

    /// Destination folder per bucket; empty string means unset
    #[serde(default, deserialize_with = "bucket_folders")]
    pub output_folders: [String; BUCKET_COUNT],
}

fn default_true() -> bool { true }

/// Accept a list of any length: extra entries are ignored, missing ones unset
fn bucket_folders<'de, D>(deserializer: D) -> std::result::Result<[String; BUCKET_COUNT], D::Error>
where
    D: Deserializer<'de>,
{
    let listed = Vec::<Option<String>>::deserialize(deserializer)?;
    let mut folders: [String; BUCKET_COUNT] = Default::default();
    for (slot, folder) in folders.iter_mut().zip(listed) {
        *slot = folder.unwrap_or_default();
    }
    Ok(folders)
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            input_folder: String::new(),
            include_subfolders: false,
            sort_method: SortKey::default(),
            reverse_sort: false,
            copy_mode: default_true(),
            output_folders: Default::default(),
        }
    }
}

impl SessionConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| TriageError::Config(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Load, falling back to defaults when the file is unreadable or malformed
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("{}; starting from defaults", e);
            Self::default()
        })
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| TriageError::ConfigPersist(e.to_string()))?;
        std::fs::write(path, content)
            .map_err(|e| TriageError::ConfigPersist(format!("{:?}: {}", path, e)))?;
        Ok(())
    }

    /// Save, logging instead of failing. A lost save never blocks the session.
    pub fn persist(&self, path: &Path) {
        match self.save(path) {
            Ok(()) => tracing::debug!("Saved session config to {:?}", path),
            Err(e) => tracing::warn!("{}", e),
        }
    }

    pub fn mode(&self) -> TransferMode {
        if self.copy_mode { TransferMode::Copy } else { TransferMode::Move }
    }

    pub fn set_mode(&mut self, mode: TransferMode) {
        self.copy_mode = mode == TransferMode::Copy;
    }

    /// Input folder as a path, `None` when not configured
    pub fn input_path(&self) -> Option<PathBuf> {
        let trimmed = self.input_folder.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(PathBuf::from(trimmed))
        }
    }

    /// Destination of a 1-based bucket, `None` when unset or out of range
    pub fn destination(&self, bucket: usize) -> Option<PathBuf> {
        let folder = self.output_folders.get(bucket.checked_sub(1)?)?.trim();
        if folder.is_empty() {
            None
        } else {
            Some(PathBuf::from(folder))
        }
    }

    /// Set or clear the destination of a 1-based bucket
    pub fn set_destination(&mut self, bucket: usize, path: Option<&Path>) -> Result<()> {
        let slot = bucket
            .checked_sub(1)
            .and_then(|i| self.output_folders.get_mut(i))
            .ok_or(TriageError::InvalidBucket(bucket))?;
        *slot = path.map(|p| p.to_string_lossy().into_owned()).unwrap_or_default();
        Ok(())
    }

    /// Number of buckets with a destination
    pub fn configured_destinations(&self) -> usize {
        (1..=BUCKET_COUNT).filter(|&b| self.destination(b).is_some()).count()
    }

    /// Whether two configs would produce a different scan
    pub fn scan_differs(&self, other: &SessionConfig) -> bool {
        self.input_folder != other.input_folder
            || self.include_subfolders != other.include_subfolders
            || self.sort_method != other.sort_method
            || self.reverse_sort != other.reverse_sort
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = SessionConfig::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.mode(), TransferMode::Copy);
        assert_eq!(config.sort_method, SortKey::Name);
    }

    #[test]
    fn test_partial_record_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("triage.json");
        std::fs::write(&path, r#"{"input_folder": "/photos", "copy_mode": false}"#).unwrap();

        let config = SessionConfig::load(&path).unwrap();
        assert_eq!(config.input_path(), Some(PathBuf::from("/photos")));
        assert_eq!(config.mode(), TransferMode::Move);
        assert_eq!(config.configured_destinations(), 0);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("triage.json");

        let mut config = SessionConfig::default();
        config.input_folder = "/in".to_string();
        config.sort_method = SortKey::Size;
        config.set_destination(2, Some(Path::new("/out/b"))).unwrap();
        config.save(&path).unwrap();

        let loaded = SessionConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.destination(2), Some(PathBuf::from("/out/b")));
        assert_eq!(loaded.destination(1), None);
    }

    #[test]
    fn test_garbage_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("triage.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(SessionConfig::load(&path), Err(TriageError::Config(_))));
    }

    #[test]
    fn test_short_and_long_folder_lists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("triage.json");

        std::fs::write(&path, r#"{"input_folder": "/x", "output_folders": ["/a", "/b"]}"#).unwrap();
        let config = SessionConfig::load(&path).unwrap();
        assert_eq!(config.destination(1), Some(PathBuf::from("/a")));
        assert_eq!(config.destination(2), Some(PathBuf::from("/b")));
        assert_eq!(config.destination(3), None);

        std::fs::write(&path, r#"{"output_folders": ["/a", null, "/c", "/d"]}"#).unwrap();
        let config = SessionConfig::load(&path).unwrap();
        assert_eq!(config.output_folders, ["/a".to_string(), String::new(), "/c".to_string()]);
        assert_eq!(config.configured_destinations(), 2);
    }

    #[test]
    fn test_legacy_subfolder_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("triage.json");
        std::fs::write(&path, r#"{"inc_subfolders": true}"#).unwrap();
        assert!(SessionConfig::load(&path).unwrap().include_subfolders);
    }

    #[test]
    fn test_load_or_default_survives_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("triage.json");
        std::fs::write(&path, r#"{"output_folders": 7}"#).unwrap();
        assert_eq!(SessionConfig::load_or_default(&path), SessionConfig::default());
    }

    #[test]
    fn test_save_to_missing_dir_is_persist_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("triage.json");
        let err = SessionConfig::default().save(&path).unwrap_err();
        assert!(matches!(err, TriageError::ConfigPersist(_)));
        assert!(!err.is_actionable());
    }

    #[test]
    fn test_destination_bounds() {
        let mut config = SessionConfig::default();
        config.output_folders = ["/a".into(), "  ".into(), "/c".into()];
        assert_eq!(config.destination(0), None);
        assert_eq!(config.destination(2), None);
        assert_eq!(config.destination(4), None);
        assert_eq!(config.configured_destinations(), 2);
        assert!(matches!(
            config.set_destination(4, None),
            Err(TriageError::InvalidBucket(4))
        ));
    }

    #[test]
    fn test_scan_differs_ignores_destinations() {
        let base = SessionConfig::default();
        let mut other = base.clone();
        other.output_folders[0] = "/x".into();
        other.copy_mode = false;
        assert!(!base.scan_differs(&other));
        other.reverse_sort = true;
        assert!(base.scan_differs(&other));
    }
}
