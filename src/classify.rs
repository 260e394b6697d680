// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Copy or move files into destination buckets, and reverse it
//!
//! Targets never overwrite an existing file: a taken name gets a numeric
//! suffix before the extension (`f.jpg`, `f_1.jpg`, `f_2.jpg`, ...).

use std::ffi::{OsStr, OsString};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::TransferMode;
use crate::history::{create_entry, HistoryEntry};
use crate::scanner::Item;
use crate::{Result, TriageError};

fn occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// First free name for `file_name` inside `dir`
pub fn unique_target(dir: &Path, file_name: &OsStr) -> PathBuf {
    let candidate = dir.join(file_name);
    if !occupied(&candidate) {
        return candidate;
    }

    let name = Path::new(file_name);
    let stem = name.file_stem().unwrap_or_default();
    let ext = name.extension();

    let mut counter: u64 = 1;
    loop {
        let mut numbered = OsString::from(stem);
        numbered.push(format!("_{}", counter));
        if let Some(ext) = ext {
            numbered.push(".");
            numbered.push(ext);
        }
        let candidate = dir.join(numbered);
        if !occupied(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Duplicate `from` at `to`, refusing to clobber and keeping the source mtime
fn copy_file(from: &Path, to: &Path) -> io::Result<()> {
    let mut src = File::open(from)?;
    let meta = src.metadata()?;
    let mut dst = OpenOptions::new().write(true).create_new(true).open(to)?;

    if let Err(e) = io::copy(&mut src, &mut dst) {
        drop(dst);
        let _ = fs::remove_file(to);
        return Err(e);
    }

    if let Err(e) = dst.set_permissions(meta.permissions()) {
        debug!("Could not copy permissions to {:?}: {}", to, e);
    }
    if let Ok(modified) = meta.modified() {
        if let Err(e) = dst.set_modified(modified) {
            debug!("Could not preserve mtime on {:?}: {}", to, e);
        }
    }
    Ok(())
}

/// Link then unlink, falling back to copy + delete (e.g. across filesystems).
///
/// Neither path replaces an existing `to`.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::hard_link(from, to) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Err(e),
        Err(e) => {
            debug!("Link {:?} -> {:?} failed ({}), copying instead", from, to, e);
            copy_file(from, to)?;
        }
    }

    if let Err(e) = fs::remove_file(from) {
        // Keep the source as the only copy
        let _ = fs::remove_file(to);
        return Err(e);
    }
    Ok(())
}

/// Copy or move `item` into `destination`.
///
/// `bucket` is only used for error reporting. On success the returned entry
/// records how to reverse the action; on failure nothing was changed.
pub fn classify(
    item: &Item,
    position: usize,
    bucket: usize,
    destination: Option<&Path>,
    mode: TransferMode,
) -> Result<HistoryEntry> {
    let destination = destination.ok_or(TriageError::DestinationUnset { bucket })?;

    fs::create_dir_all(destination).map_err(|source| TriageError::DirectoryCreate {
        path: destination.to_path_buf(),
        source,
    })?;

    let file_name = item.path.file_name().ok_or_else(|| TriageError::CopyMove {
        from: item.path.clone(),
        to: destination.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "source has no file name"),
    })?;
    let target = unique_target(destination, file_name);

    let outcome = match mode {
        TransferMode::Copy => copy_file(&item.path, &target),
        TransferMode::Move => move_file(&item.path, &target),
    };
    outcome.map_err(|source| TriageError::CopyMove {
        from: item.path.clone(),
        to: target.clone(),
        source,
    })?;

    info!("{} {:?} -> {:?}", mode, item.path, target);
    Ok(create_entry(item.clone(), target, position, mode))
}

/// Physically reverse a classification
pub fn revert(entry: &HistoryEntry) -> Result<()> {
    let undo_err = |message: String| TriageError::Undo {
        path: entry.produced_path.clone(),
        message,
    };

    match entry.mode {
        TransferMode::Copy => {
            fs::remove_file(&entry.produced_path).map_err(|e| undo_err(e.to_string()))?;
            info!("Undo copy: removed {:?}", entry.produced_path);
        }
        TransferMode::Move => {
            let restored = entry.restored_path();
            if occupied(restored) {
                warn!("Undo target {:?} is occupied", restored);
                return Err(undo_err(format!("{:?} already exists", restored)));
            }
            move_file(&entry.produced_path, restored).map_err(|e| undo_err(e.to_string()))?;
            info!("Undo move: {:?} -> {:?}", entry.produced_path, restored);
        }
    }
    Ok(())
}
