// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! End-to-end session behaviour against a real directory tree

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use triage::{
    Item, SessionConfig, SessionController, SessionState, TransferMode, TriageError,
};

struct Fixture {
    root: TempDir,
}

impl Fixture {
    fn new(files: &[&str]) -> Self {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("in")).unwrap();
        let fixture = Self { root };
        for f in files {
            fixture.write(f, f);
        }
        fixture
    }

    fn write(&self, rel: &str, body: &str) {
        let path = self.input().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    fn input(&self) -> PathBuf {
        self.root.path().join("in")
    }

    fn bucket(&self, n: usize) -> PathBuf {
        self.root.path().join(format!("bucket{}", n))
    }

    fn config(&self, mode: TransferMode) -> SessionConfig {
        let mut config = SessionConfig::default();
        config.input_folder = self.input().to_string_lossy().into_owned();
        config.set_mode(mode);
        config.set_destination(1, Some(&self.bucket(1))).unwrap();
        config.set_destination(2, Some(&self.bucket(2))).unwrap();
        config
    }
}

fn names(session: &SessionController) -> Vec<String> {
    session.queue().items().iter().map(Item::file_name).collect()
}

fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn move_then_undo_round_trip() {
    let fx = Fixture::new(&["a.jpg", "b.jpg"]);
    let mut session = SessionController::new(fx.config(TransferMode::Move));
    assert_eq!(session.state(), SessionState::Ready);

    let snap = session.classify(1).unwrap();
    assert_eq!(names(&session), vec!["b.jpg"]);
    assert_eq!(snap.history, 1);
    assert!(!fx.input().join("a.jpg").exists());
    assert!(fx.bucket(1).join("a.jpg").exists());

    let snap = session.undo().unwrap();
    assert_eq!(names(&session), vec!["a.jpg", "b.jpg"]);
    assert_eq!(snap.cursor, 0);
    assert_eq!(snap.history, 0);
    assert!(fx.input().join("a.jpg").exists());
    assert!(files_in(&fx.bucket(1)).is_empty());
}

#[test]
fn undo_restores_original_position() {
    let fx = Fixture::new(&["a.jpg", "b.jpg", "c.jpg", "d.jpg"]);
    let mut session = SessionController::new(fx.config(TransferMode::Move));
    session.advance();
    session.advance();
    assert_eq!(session.current().unwrap().file_name(), "c.jpg");

    session.classify(2).unwrap();
    assert_eq!(session.queue().len(), 3);

    let snap = session.undo().unwrap();
    assert_eq!(snap.queue_length, 4);
    assert_eq!(snap.cursor, 2);
    assert_eq!(names(&session), vec!["a.jpg", "b.jpg", "c.jpg", "d.jpg"]);
    assert_eq!(fs::read_to_string(fx.input().join("c.jpg")).unwrap(), "c.jpg");
}

#[test]
fn undo_copy_only_removes_duplicate() {
    let fx = Fixture::new(&["a.jpg"]);
    let mut session = SessionController::new(fx.config(TransferMode::Copy));

    session.classify(1).unwrap();
    assert!(fx.input().join("a.jpg").exists());
    assert!(fx.bucket(1).join("a.jpg").exists());

    session.undo().unwrap();
    assert_eq!(fs::read_to_string(fx.input().join("a.jpg")).unwrap(), "a.jpg");
    assert!(!fx.bucket(1).join("a.jpg").exists());
    assert_eq!(names(&session), vec!["a.jpg"]);
}

#[test]
fn same_names_get_numbered() {
    let fx = Fixture::new(&["x/f.jpg", "y/f.jpg", "z/f.jpg"]);
    let mut config = fx.config(TransferMode::Move);
    config.include_subfolders = true;
    let mut session = SessionController::new(config);
    assert_eq!(session.queue().len(), 3);

    for _ in 0..3 {
        session.classify(1).unwrap();
    }
    assert_eq!(files_in(&fx.bucket(1)), vec!["f.jpg", "f_1.jpg", "f_2.jpg"]);
    assert_eq!(session.state(), SessionState::NoItemsFound);
}

#[test]
fn skip_then_go_back_restores_queue() {
    let fx = Fixture::new(&["a.jpg", "b.mp4", "c.swf"]);
    let mut session = SessionController::new(fx.config(TransferMode::Move));
    session.advance();
    let before = names(&session);

    let snap = session.skip();
    assert_eq!(snap.skipped, 1);
    assert_eq!(names(&session), vec!["a.jpg", "c.swf"]);

    let snap = session.go_back();
    assert_eq!(snap.skipped, 0);
    assert_eq!(names(&session), before);
    assert_eq!(session.current().unwrap().file_name(), "b.mp4");
}

#[test]
fn skip_last_then_go_back_restores_queue() {
    let fx = Fixture::new(&["a.jpg", "b.jpg", "c.jpg"]);
    let mut session = SessionController::new(fx.config(TransferMode::Move));
    session.retreat();
    let before = names(&session);

    let snap = session.skip();
    assert_eq!(snap.cursor, 0);
    assert_eq!(names(&session), vec!["a.jpg", "b.jpg"]);

    let snap = session.go_back();
    assert_eq!(names(&session), before);
    assert_eq!(snap.current.unwrap().file_name(), "c.jpg");
}

#[test]
fn go_back_on_empty_stack_is_noop() {
    let fx = Fixture::new(&["a.jpg", "b.jpg"]);
    let mut session = SessionController::new(fx.config(TransferMode::Move));
    session.advance();

    let snap = session.go_back();
    assert_eq!(snap.cursor, 1);
    assert_eq!(names(&session), vec!["a.jpg", "b.jpg"]);
}

#[test]
fn classify_needs_two_destinations() {
    let fx = Fixture::new(&["a.jpg"]);
    let mut config = fx.config(TransferMode::Move);
    config.set_destination(2, None).unwrap();
    let mut session = SessionController::new(config);
    assert_eq!(session.state(), SessionState::InsufficientDestinations);

    let err = session.classify(1).unwrap_err();
    assert!(matches!(err, TriageError::InsufficientDestinations { configured: 1 }));
    assert!(!fx.bucket(1).exists());
    assert!(fx.input().join("a.jpg").exists());
    assert_eq!(session.queue().len(), 1);
}

#[test]
fn failed_transfer_leaves_queue_unchanged() {
    let fx = Fixture::new(&["a.jpg", "b.jpg"]);
    let mut session = SessionController::new(fx.config(TransferMode::Move));
    fs::remove_file(fx.input().join("a.jpg")).unwrap();

    let err = session.classify(1).unwrap_err();
    assert!(matches!(err, TriageError::CopyMove { .. }));
    assert_eq!(names(&session), vec!["a.jpg", "b.jpg"]);
    assert!(session.history().is_empty());
}

#[test]
fn reconfiguring_input_rescans() {
    let fx = Fixture::new(&["a.jpg"]);
    fx.write("more/b.png", "b");
    let mut session = SessionController::new(fx.config(TransferMode::Copy));
    assert_eq!(names(&session), vec!["a.jpg"]);

    let mut config = session.config().clone();
    config.input_folder = fx.input().join("more").to_string_lossy().into_owned();
    let snap = session.configure(config);
    assert_eq!(snap.queue_length, 1);
    assert_eq!(snap.current.unwrap().file_name(), "b.png");
}
