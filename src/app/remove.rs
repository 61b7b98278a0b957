//! `nebula remove` — delete a theme from the cache.

use std::path::{Path, PathBuf};

use crate::cache::same_file;
use crate::error::{CacheError, CliError};
use crate::theme::ThemeRef;

use super::App;

pub fn run(app: &App, identifier: &str, all_versions: bool, force: bool) -> Result<(), CliError> {
    let mut theme = ThemeRef::parse(identifier)?;
    let mut state = app.load_state().unwrap_or_default();

    // Resolve an unpinned identifier to the newest cached version so the
    // entry actually on disk is the one removed.
    if !theme.version_explicit && !all_versions {
        match app.cache.newest_local_version(&theme) {
            Some(newest) => theme = theme.with_version(&newest),
            None => {
                app.renderer
                    .warn(&format!("Theme not found in cache: {}", theme.id()));
                return Ok(());
            }
        }
    }

    let active = (!state.current_path.is_empty()).then(|| PathBuf::from(&state.current_path));
    let removed = match app.cache.remove(&theme, all_versions, active.as_deref(), force) {
        Ok(removed) => removed,
        Err(CacheError::CurrentlyActive(id)) => {
            app.renderer
                .warn(&format!("Cannot remove the currently active theme: {id}"));
            app.renderer
                .line("Apply a different theme first, or pass --force to remove anyway.");
            return Ok(());
        }
        Err(CacheError::NotFound(id)) => {
            app.renderer.warn(&format!("Theme not found in cache: {id}"));
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if all_versions {
        app.renderer.success(&format!(
            "Removed {} version(s) of {}",
            removed.len(),
            theme.id()
        ));
    } else {
        app.renderer.success(&format!("Removed {theme}"));
    }

    // A forced removal can take the active entry with it; drop the stale
    // record so `current` reports honestly.
    let removed_active = active
        .as_deref()
        .is_some_and(|active: &Path| removed.iter().any(|path| same_file(path, active)));
    if removed_active {
        state.clear_current();
        app.save_state(&state)?;
        app.renderer
            .warn("You removed the active theme. Apply a new one with: nebula apply <author>/<theme>");
    }
    Ok(())
}
