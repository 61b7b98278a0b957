//! On-disk theme cache.
//!
//! The cache is laid out as `<root>/<author>/<name>/<version>.toml` and the
//! directory tree itself is the only index: an entry exists exactly when its
//! file does. A reserved state file lives at the cache root and is never
//! treated as an author directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::CacheError;
use crate::theme::{self, ThemeRef, THEME_FILE_EXT};

/// Minimal index contract over cached theme entries.
///
/// Backed by a directory walk today; a manifest-backed implementation could
/// replace it without changing callers.
pub trait CacheIndex {
    /// True iff the entry exists as a regular file.
    fn exists(&self, theme: &ThemeRef) -> bool;
    /// Write validated content to the entry path, creating parents as needed.
    fn put(&self, theme: &ThemeRef, content: &str) -> Result<PathBuf, CacheError>;
    /// Enumerate all cached entries, sorted by author, name, version.
    fn list(&self) -> Result<Vec<ThemeRef>, CacheError>;
    /// Delete one entry and prune directories it leaves empty.
    fn delete(&self, theme: &ThemeRef) -> Result<(), CacheError>;
}

/// Directory-walk cache store rooted at the tool's config directory.
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Deterministic on-disk path for a reference.
    pub fn entry_path(&self, theme: &ThemeRef) -> PathBuf {
        self.root
            .join(&theme.author)
            .join(&theme.name)
            .join(theme.file_name())
    }

    /// Directory holding all cached versions of one theme.
    pub fn theme_dir(&self, theme: &ThemeRef) -> PathBuf {
        self.root.join(&theme.author).join(&theme.name)
    }

    /// Newest locally cached version for a theme, if any version is cached.
    ///
    /// Concrete `major.minor` versions win over a bare `latest` entry, which
    /// is only returned when it is the sole cached file.
    pub fn newest_local_version(&self, theme: &ThemeRef) -> Option<String> {
        let dir = self.theme_dir(theme);
        let entries = fs::read_dir(&dir).ok()?;

        let mut versions = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                continue;
            }
            if let Some(version) = version_from_file(&path) {
                versions.push(version);
            }
        }
        theme::newest_version(&versions).map(str::to_string)
    }

    /// Remove every cached entry except the one at `exclude`, compared as a
    /// resolved path. Individual failures are logged and skipped; returns the
    /// number of entries actually removed.
    pub fn clean(&self, exclude: Option<&Path>) -> Result<usize, CacheError> {
        let entries = self.list()?;
        let mut removed = 0usize;

        for theme in &entries {
            let path = self.entry_path(theme);
            if let Some(keep) = exclude {
                if same_file(&path, keep) {
                    continue;
                }
            }
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => warn!(path = %path.display(), error = %e, "failed to remove cached theme"),
            }
        }

        self.prune_empty_dirs();
        Ok(removed)
    }

    /// Delete a theme from the cache.
    ///
    /// With `all_versions`, the whole `<author>/<name>` directory goes away;
    /// otherwise only the referenced version file. Refuses with
    /// `CurrentlyActive` when the deletion would cover `active` (compared as
    /// a resolved path), unless `force` is set.
    pub fn remove(
        &self,
        theme: &ThemeRef,
        all_versions: bool,
        active: Option<&Path>,
        force: bool,
    ) -> Result<Vec<PathBuf>, CacheError> {
        let targets = if all_versions {
            let dir = self.theme_dir(theme);
            if !dir.is_dir() {
                return Err(CacheError::NotFound(theme.id()));
            }
            let mut files = Vec::new();
            for entry in fs::read_dir(&dir)
                .map_err(|e| CacheError::Io(dir.clone(), e))?
                .flatten()
            {
                let path = entry.path();
                if version_from_file(&path).is_some() {
                    files.push(path);
                }
            }
            files.sort();
            files
        } else {
            let path = self.entry_path(theme);
            if !path.is_file() {
                return Err(CacheError::NotFound(theme.to_string()));
            }
            vec![path]
        };

        if !force {
            if let Some(active) = active {
                if targets.iter().any(|path| same_file(path, active)) {
                    return Err(CacheError::CurrentlyActive(theme.to_string()));
                }
            }
        }

        for path in &targets {
            fs::remove_file(path).map_err(|e| CacheError::Io(path.clone(), e))?;
        }
        self.prune_upwards(&self.theme_dir(theme));
        Ok(targets)
    }

    /// Remove now-empty name and author directories, bottom-up. Best effort.
    fn prune_empty_dirs(&self) {
        let Ok(authors) = fs::read_dir(&self.root) else {
            return;
        };
        for author in authors.flatten() {
            let author_dir = author.path();
            if !author_dir.is_dir() {
                continue;
            }
            if let Ok(names) = fs::read_dir(&author_dir) {
                for name in names.flatten() {
                    let name_dir = name.path();
                    if name_dir.is_dir() {
                        remove_if_empty(&name_dir);
                    }
                }
            }
            remove_if_empty(&author_dir);
        }
    }

    /// Prune one theme's name directory and then its author directory.
    fn prune_upwards(&self, name_dir: &Path) {
        remove_if_empty(name_dir);
        if let Some(author_dir) = name_dir.parent() {
            if author_dir != self.root {
                remove_if_empty(author_dir);
            }
        }
    }
}

impl CacheIndex for CacheStore {
    fn exists(&self, theme: &ThemeRef) -> bool {
        self.entry_path(theme).is_file()
    }

    fn put(&self, theme: &ThemeRef, content: &str) -> Result<PathBuf, CacheError> {
        let path = self.entry_path(theme);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| CacheError::Io(parent.to_path_buf(), e))?;
        }
        fs::write(&path, content).map_err(|e| CacheError::Io(path.clone(), e))?;
        Ok(path)
    }

    fn list(&self) -> Result<Vec<ThemeRef>, CacheError> {
        let mut themes = Vec::new();
        let authors = match fs::read_dir(&self.root) {
            Ok(authors) => authors,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(themes),
            Err(e) => return Err(CacheError::Io(self.root.clone(), e)),
        };

        // Non-directory entries at any level (the reserved state file, stray
        // files) are skipped rather than treated as corruption.
        for author in authors.flatten() {
            let author_dir = author.path();
            if !author_dir.is_dir() {
                continue;
            }
            let Ok(names) = fs::read_dir(&author_dir) else {
                continue;
            };
            for name in names.flatten() {
                let name_dir = name.path();
                if !name_dir.is_dir() {
                    continue;
                }
                let Ok(versions) = fs::read_dir(&name_dir) else {
                    continue;
                };
                for version in versions.flatten() {
                    let path = version.path();
                    let Some(version) = version_from_file(&path) else {
                        continue;
                    };
                    themes.push(ThemeRef {
                        author: author.file_name().to_string_lossy().into_owned(),
                        name: name.file_name().to_string_lossy().into_owned(),
                        version,
                        version_explicit: true,
                    });
                }
            }
        }

        themes.sort_by(|a, b| {
            a.author
                .cmp(&b.author)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.version.cmp(&b.version))
        });
        Ok(themes)
    }

    fn delete(&self, theme: &ThemeRef) -> Result<(), CacheError> {
        self.remove(theme, false, None, true).map(|_| ())
    }
}

/// Extract the version string from a `<version>.toml` cache file path.
fn version_from_file(path: &Path) -> Option<String> {
    if !path.is_file() {
        return None;
    }
    if path.extension().and_then(|e| e.to_str()) != Some(THEME_FILE_EXT) {
        return None;
    }
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
}

/// Compare two paths as resolved filesystem locations.
///
/// Canonicalization survives naming edge cases (relative segments, symlinked
/// parents); when a path cannot be canonicalized the literal form is used.
pub(crate) fn same_file(a: &Path, b: &Path) -> bool {
    let resolve = |p: &Path| fs::canonicalize(p).unwrap_or_else(|_| p.to_path_buf());
    resolve(a) == resolve(b)
}

/// Remove a directory only when it is empty. Best effort.
fn remove_if_empty(dir: &Path) {
    let is_empty = fs::read_dir(dir)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false);
    if !is_empty {
        return;
    }
    if let Err(e) = fs::remove_dir(dir) {
        warn!(path = %dir.display(), error = %e, "failed to prune empty cache directory");
    }
}
