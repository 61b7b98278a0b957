//! Durable record of the active theme and rollback slot.
//!
//! The record is a single JSON object read and written whole. Saves go
//! through a sibling temporary file and rename so a crash mid-write cannot
//! corrupt the last known-good record; a save that fails is not committed.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StateError;

/// Current/previous theme record plus download history.
///
/// `current_path`, when non-empty, names the cache entry the live symlink
/// points at. Violations (an evicted entry) are detected by readers, not
/// prevented here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct State {
    pub current_theme: String,
    pub current_path: String,
    pub previous_theme: String,
    pub previous_path: String,
    /// `author/name` identifiers already counted as downloads.
    pub downloads: BTreeSet<String>,
}

impl State {
    /// Load the record, falling back to the empty default when absent.
    pub fn load(path: &Path) -> Result<Self, StateError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(StateError::Io(path.to_path_buf(), e)),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    /// Persist the whole record durably.
    pub fn save(&self, path: &Path) -> Result<(), StateError> {
        let json = serde_json::to_vec_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StateError::Io(parent.to_path_buf(), e))?;
        }
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(|e| StateError::Io(tmp_path.clone(), e))?;
        // Rename is atomic on the same filesystem, making this all or nothing.
        fs::rename(&tmp_path, path).map_err(|e| StateError::Io(path.to_path_buf(), e))?;
        Ok(())
    }

    /// Record a newly activated theme, shifting the old current into the
    /// rollback slot.
    pub fn apply(&mut self, theme: &str, path: &str) {
        self.previous_theme = std::mem::take(&mut self.current_theme);
        self.previous_path = std::mem::take(&mut self.current_path);
        self.current_theme = theme.to_string();
        self.current_path = path.to_string();
    }

    /// Swap the current and rollback slots in place.
    ///
    /// Calling this twice restores the record exactly, which is the
    /// documented way to undo a rollback.
    pub fn rollback(&mut self) {
        std::mem::swap(&mut self.current_theme, &mut self.previous_theme);
        std::mem::swap(&mut self.current_path, &mut self.previous_path);
    }

    /// True when a rollback target is recorded.
    pub fn has_previous(&self) -> bool {
        !self.previous_theme.is_empty()
    }

    /// Remember that `author/name` has been counted as a download.
    pub fn mark_downloaded(&mut self, theme_id: &str) {
        self.downloads.insert(theme_id.to_string());
    }

    pub fn has_downloaded(&self, theme_id: &str) -> bool {
        self.downloads.contains(theme_id)
    }

    /// Forget the active theme, e.g. after its cache entry was removed.
    pub fn clear_current(&mut self) {
        self.current_theme.clear();
        self.current_path.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::TestTempDir;

    #[test]
    fn load_of_missing_file_is_empty_default() {
        let tmp = TestTempDir::new("state");
        let state = State::load(&tmp.child("state.json")).expect("load");
        assert_eq!(state, State::default());
    }

    #[test]
    fn save_and_load_round_trip() {
        let tmp = TestTempDir::new("state");
        let path = tmp.child("state.json");

        let mut state = State::default();
        state.apply("alice/rainbow@1.2", "/cache/alice/rainbow/1.2.toml");
        state.mark_downloaded("alice/rainbow");
        state.save(&path).expect("save");

        let loaded = State::load(&path).expect("load");
        assert_eq!(loaded, state);
        assert!(loaded.has_downloaded("alice/rainbow"));
        assert!(!loaded.has_downloaded("bob/ocean"));
    }

    #[test]
    fn load_rejects_malformed_json() {
        let tmp = TestTempDir::new("state");
        let path = tmp.write_text("state.json", "{ not json");
        assert!(State::load(&path).is_err());
    }

    #[test]
    fn load_tolerates_missing_history_field() {
        let tmp = TestTempDir::new("state");
        let path = tmp.write_text(
            "state.json",
            r#"{
  "current_theme": "alice/rainbow",
  "current_path": "/cache/alice/rainbow/latest.toml",
  "previous_theme": "",
  "previous_path": ""
}"#,
        );
        let state = State::load(&path).expect("load");
        assert_eq!(state.current_theme, "alice/rainbow");
        assert!(state.downloads.is_empty());
    }

    #[test]
    fn apply_shifts_current_into_previous() {
        let mut state = State::default();
        state.apply("alice/rainbow", "/cache/a");
        state.apply("bob/ocean@2.0", "/cache/b");

        assert_eq!(state.current_theme, "bob/ocean@2.0");
        assert_eq!(state.current_path, "/cache/b");
        assert_eq!(state.previous_theme, "alice/rainbow");
        assert_eq!(state.previous_path, "/cache/a");
    }

    #[test]
    fn rollback_twice_is_identity() {
        let mut state = State::default();
        state.apply("alice/rainbow", "/cache/a");
        state.apply("bob/ocean@2.0", "/cache/b");
        let before = state.clone();

        state.rollback();
        assert_eq!(state.current_theme, "alice/rainbow");
        assert_eq!(state.previous_theme, "bob/ocean@2.0");

        state.rollback();
        assert_eq!(state, before);
    }

    #[test]
    fn has_previous_reflects_rollback_slot() {
        let mut state = State::default();
        assert!(!state.has_previous());
        state.apply("alice/rainbow", "/cache/a");
        assert!(!state.has_previous());
        state.apply("bob/ocean", "/cache/b");
        assert!(state.has_previous());
    }

    #[test]
    fn clear_current_leaves_rollback_slot() {
        let mut state = State::default();
        state.apply("alice/rainbow", "/cache/a");
        state.apply("bob/ocean", "/cache/b");
        state.clear_current();
        assert!(state.current_theme.is_empty());
        assert!(state.current_path.is_empty());
        assert_eq!(state.previous_theme, "alice/rainbow");
    }
}
