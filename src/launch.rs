// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Hand a file or URL to the desktop's default program

use std::ffi::OsStr;
use std::io;
use std::process::Command;
use std::thread;

/// Open `target` with whatever the OS associates with it
pub fn open_default(target: &OsStr) -> io::Result<()> {
    let mut child = opener(target)?.spawn()?;
    // Reap the launcher so it never lingers as a zombie
    thread::spawn(move || {
        let _ = child.wait();
    });
    Ok(())
}

#[cfg(target_os = "linux")]
fn opener(target: &OsStr) -> io::Result<Command> {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(target);
    Ok(cmd)
}

#[cfg(target_os = "macos")]
fn opener(target: &OsStr) -> io::Result<Command> {
    let mut cmd = Command::new("open");
    cmd.arg(target);
    Ok(cmd)
}

#[cfg(target_os = "windows")]
fn opener(target: &OsStr) -> io::Result<Command> {
    let mut cmd = Command::new("cmd");
    cmd.args(["/c", "start", ""]).arg(target);
    Ok(cmd)
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn opener(target: &OsStr) -> io::Result<Command> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!("no default program to open {:?} on this platform", target),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(target_os = "linux")]
    #[test]
    fn test_opener_passes_target() {
        let cmd = opener(OsStr::new("/tmp/a.jpg")).unwrap();
        assert_eq!(cmd.get_program(), "xdg-open");
        assert_eq!(cmd.get_args().collect::<Vec<_>>(), vec![OsStr::new("/tmp/a.jpg")]);
    }

    #[cfg(target_os = "windows")]
    #[test]
    fn test_opener_uses_start() {
        let cmd = opener(OsStr::new("a.jpg")).unwrap();
        assert_eq!(cmd.get_program(), "cmd");
        assert_eq!(cmd.get_args().last(), Some(OsStr::new("a.jpg")));
    }
}
