//! Filesystem layout resolution and first-run initialization.
//!
//! All writes use race-safe create semantics so two invocations
//! bootstrapping simultaneously cannot clobber each other's files.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::StateError;
use crate::state::State;

/// Reserved state file name at the cache root.
pub const STATE_FILE_NAME: &str = "state.json";

/// File name of the managed live configuration.
pub const LIVE_CONFIG_NAME: &str = "starship.toml";

/// Resolved on-disk locations for one invocation.
#[derive(Debug, Clone)]
pub struct Layout {
    /// Theme cache root (`~/.config/nebula`).
    pub cache_root: PathBuf,
    /// State record at the cache root.
    pub state_file: PathBuf,
    /// Live configuration path the prompt renderer reads.
    pub live_config: PathBuf,
    /// One-slot backup of a pre-existing unmanaged configuration.
    pub backup_file: PathBuf,
}

impl Layout {
    /// Resolve the layout from env/home conventions.
    pub fn resolve() -> Option<Self> {
        config_root_dir().map(Self::under_config_root)
    }

    /// Build the layout under an explicit config root.
    pub fn under_config_root(config_root: PathBuf) -> Self {
        let cache_root = config_root.join("nebula");
        Self {
            state_file: cache_root.join(STATE_FILE_NAME),
            live_config: config_root.join(LIVE_CONFIG_NAME),
            backup_file: cache_root
                .join(backup_owner())
                .join("backup")
                .join("latest.toml"),
            cache_root,
        }
    }

    /// Identifier under which the backup slot is addressable, so a rescued
    /// configuration can be re-applied like any cached theme.
    pub fn backup_identifier(&self) -> String {
        format!("{}/backup", backup_owner())
    }

    /// Create the cache root and an empty default state file if absent.
    pub fn ensure(&self) -> Result<(), StateError> {
        std::fs::create_dir_all(&self.cache_root)
            .map_err(|e| StateError::Io(self.cache_root.clone(), e))?;
        ensure_default_state_at(&self.state_file)
    }
}

/// Write the empty default state record unless the file already exists.
fn ensure_default_state_at(path: &Path) -> Result<(), StateError> {
    if path.exists() {
        return Ok(());
    }
    let json = serde_json::to_vec_pretty(&State::default())?;

    // create_new avoids clobbering if another process wins a race to create.
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut file) => file
            .write_all(&json)
            .map_err(|e| StateError::Io(path.to_path_buf(), e)),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(StateError::Io(path.to_path_buf(), e)),
    }
}

/// Resolve the base config directory from env/home conventions.
pub fn config_root_dir() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".config"))
        .or_else(dirs::config_dir)
}

/// OS user the backup slot is keyed to.
fn backup_owner() -> String {
    whoami::username().unwrap_or_else(|_| "local".to_string())
}
