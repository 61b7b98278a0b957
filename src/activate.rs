//! Atomic activation of cached themes.
//!
//! The prompt renderer reads one fixed configuration path. Activation makes
//! that path a symlink to a cache entry by creating the replacement link at
//! a sibling temporary name and renaming it over the live path. Rename over
//! an existing path is atomic on the same filesystem, so the live path is
//! always either the old target or the new one, never missing or partial.
//!
//! A pre-existing regular file at the live path is user-authored content and
//! is copied aside exactly once before the first takeover; a live path that
//! is already a symlink is system-managed and is never backed up.

use std::fs;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};

use rand::rngs::OsRng;
use rand::RngCore;
use tracing::warn;

use crate::error::ActivateError;

/// Symlink swapper bound to a live configuration path and backup slot.
#[derive(Debug, Clone)]
pub struct Activator {
    live_path: PathBuf,
    backup_path: PathBuf,
}

impl Activator {
    pub fn new(live_path: impl Into<PathBuf>, backup_path: impl Into<PathBuf>) -> Self {
        Self {
            live_path: live_path.into(),
            backup_path: backup_path.into(),
        }
    }

    pub fn live_path(&self) -> &Path {
        &self.live_path
    }

    /// Point the live configuration at `target`.
    ///
    /// Returns the backup path when a pre-existing unmanaged file was copied
    /// aside, `None` otherwise. On any error the live path is left exactly
    /// as it was.
    pub fn activate(&self, target: &Path) -> Result<Option<PathBuf>, ActivateError> {
        let backup = self.backup_unmanaged()?;
        self.swap_symlink(target)?;
        Ok(backup)
    }

    /// Target of the live symlink.
    pub fn current_target(&self) -> Result<PathBuf, ActivateError> {
        let meta = match fs::symlink_metadata(&self.live_path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ActivateError::NotFound(self.live_path.clone()));
            }
            Err(e) => return Err(ActivateError::ActivationFailed(self.live_path.clone(), e)),
        };
        if !meta.file_type().is_symlink() {
            return Err(ActivateError::NotASymlink(self.live_path.clone()));
        }
        fs::read_link(&self.live_path)
            .map_err(|e| ActivateError::ActivationFailed(self.live_path.clone(), e))
    }

    /// Copy a pre-existing unmanaged configuration to the backup slot.
    ///
    /// The copy is a full read followed by a write, so the original stays
    /// intact if anything fails partway; on failure nothing else is touched.
    fn backup_unmanaged(&self) -> Result<Option<PathBuf>, ActivateError> {
        let meta = match fs::symlink_metadata(&self.live_path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ActivateError::BackupFailed(self.live_path.clone(), e)),
        };
        if meta.file_type().is_symlink() {
            return Ok(None);
        }

        let content = fs::read(&self.live_path)
            .map_err(|e| ActivateError::BackupFailed(self.live_path.clone(), e))?;
        if let Some(parent) = self.backup_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ActivateError::BackupFailed(self.backup_path.clone(), e))?;
        }
        fs::write(&self.backup_path, content)
            .map_err(|e| ActivateError::BackupFailed(self.backup_path.clone(), e))?;
        Ok(Some(self.backup_path.clone()))
    }

    /// Create the replacement link at a temporary sibling name, then rename
    /// it over the live path.
    fn swap_symlink(&self, target: &Path) -> Result<(), ActivateError> {
        let tmp_path = self.temp_link_path();
        symlink(target, &tmp_path)
            .map_err(|e| ActivateError::ActivationFailed(self.live_path.clone(), e))?;

        if let Err(e) = fs::rename(&tmp_path, &self.live_path) {
            if let Err(cleanup) = fs::remove_file(&tmp_path) {
                warn!(path = %tmp_path.display(), error = %cleanup, "failed to remove temporary symlink");
            }
            return Err(ActivateError::ActivationFailed(self.live_path.clone(), e));
        }
        Ok(())
    }

    /// Unique sibling name for the temporary link. Staying in the live
    /// path's directory keeps the final rename on one filesystem.
    fn temp_link_path(&self) -> PathBuf {
        let mut bytes = [0u8; 4];
        OsRng.fill_bytes(&mut bytes);
        let file_name = self
            .live_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "config".to_string());
        self.live_path
            .with_file_name(format!(".{file_name}.{:08x}.tmp", u32::from_be_bytes(bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::TestTempDir;

    fn fixture() -> (TestTempDir, Activator) {
        let tmp = TestTempDir::new("activate");
        let activator = Activator::new(
            tmp.child("config/starship.toml"),
            tmp.child("config/nebula/tester/backup/latest.toml"),
        );
        std::fs::create_dir_all(tmp.child("config")).expect("config dir");
        (tmp, activator)
    }

    #[test]
    fn activate_creates_symlink_to_target() {
        let (tmp, activator) = fixture();
        let target = tmp.write_text("cache/alice/rainbow/1.2.toml", "format = \"$all\"\n");

        let backup = activator.activate(&target).expect("activate");
        assert!(backup.is_none(), "no pre-existing file, no backup");
        assert_eq!(activator.current_target().expect("target"), target);
    }

    #[test]
    fn activate_backs_up_unmanaged_file_once() {
        let (tmp, activator) = fixture();
        let target_a = tmp.write_text("cache/alice/rainbow/1.2.toml", "a");
        let target_b = tmp.write_text("cache/bob/ocean/2.0.toml", "b");
        tmp.write_text("config/starship.toml", "user authored");

        let backup = activator.activate(&target_a).expect("first activate");
        let backup = backup.expect("unmanaged file should be backed up");
        assert_eq!(
            std::fs::read_to_string(&backup).expect("backup readable"),
            "user authored"
        );

        // The live path is now managed; a second activation must not touch
        // the backup slot again.
        std::fs::write(&backup, "preserved").expect("seed backup");
        let second = activator.activate(&target_b).expect("second activate");
        assert!(second.is_none());
        assert_eq!(
            std::fs::read_to_string(&backup).expect("backup readable"),
            "preserved"
        );
        assert_eq!(activator.current_target().expect("target"), target_b);
    }

    #[test]
    fn activate_replaces_previous_symlink() {
        let (tmp, activator) = fixture();
        let target_a = tmp.write_text("cache/a.toml", "a");
        let target_b = tmp.write_text("cache/b.toml", "b");

        activator.activate(&target_a).expect("first activate");
        activator.activate(&target_b).expect("second activate");
        assert_eq!(activator.current_target().expect("target"), target_b);
    }

    #[test]
    fn failed_swap_leaves_live_path_untouched() {
        let (tmp, activator) = fixture();
        let target_a = tmp.write_text("cache/a.toml", "a");
        activator.activate(&target_a).expect("first activate");

        // Turning the live path's parent read-only makes both the temp link
        // creation and the rename fail.
        let config_dir = tmp.child("config");
        let mut perms = std::fs::metadata(&config_dir).expect("meta").permissions();
        let original = perms.clone();
        use std::os::unix::fs::PermissionsExt;
        perms.set_mode(0o555);
        std::fs::set_permissions(&config_dir, perms).expect("chmod");

        // Permission bits do not constrain root; skip when the directory is
        // still writable.
        if std::fs::write(config_dir.join(".probe"), "x").is_ok() {
            std::fs::set_permissions(&config_dir, original).expect("restore");
            return;
        }

        let target_b = tmp.write_text("cache/b.toml", "b");
        let err = activator.activate(&target_b).expect_err("must fail");
        assert!(matches!(err, ActivateError::ActivationFailed(_, _)));

        std::fs::set_permissions(&config_dir, original).expect("restore");
        assert_eq!(activator.current_target().expect("target"), target_a);
    }

    #[test]
    fn current_target_distinguishes_missing_and_foreign() {
        let (tmp, activator) = fixture();
        let err = activator.current_target().expect_err("missing live path");
        assert!(matches!(err, ActivateError::NotFound(_)));

        tmp.write_text("config/starship.toml", "plain file");
        let err = activator.current_target().expect_err("foreign live path");
        assert!(matches!(err, ActivateError::NotASymlink(_)));
    }

    #[test]
    fn failed_backup_aborts_before_touching_live_path() {
        let tmp = TestTempDir::new("activate-backup");
        std::fs::create_dir_all(tmp.child("config")).expect("config dir");
        tmp.write_text("config/starship.toml", "user authored");
        // A backup path whose parent is a regular file cannot be created.
        let blocked = tmp.write_text("blocked", "file, not a directory");
        let activator = Activator::new(
            tmp.child("config/starship.toml"),
            blocked.join("backup/latest.toml"),
        );

        let target = tmp.write_text("cache/a.toml", "a");
        let err = activator.activate(&target).expect_err("must fail");
        assert!(matches!(err, ActivateError::BackupFailed(_, _)));

        // The original file is still a plain file with its content intact.
        let meta = std::fs::symlink_metadata(tmp.child("config/starship.toml")).expect("meta");
        assert!(meta.file_type().is_file());
        assert_eq!(
            std::fs::read_to_string(tmp.child("config/starship.toml")).expect("read"),
            "user authored"
        );
    }
}
