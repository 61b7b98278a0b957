//! `nebula rollback` — switch back to the previously applied theme.
//!
//! Running rollback twice returns to the starting point; the two state slots
//! simply trade places each time.

use std::path::PathBuf;

use crate::api::ThemeSource;
use crate::cache::CacheIndex;
use crate::error::{CacheError, CliError};
use crate::theme::ThemeRef;
use crate::validate;

use super::App;

pub async fn run(app: &App, source: &dyn ThemeSource) -> Result<(), CliError> {
    let mut state = app.load_state()?;

    if !state.has_previous() {
        app.renderer.warn("No previous theme to roll back to");
        return Ok(());
    }
    if state.previous_path.is_empty() {
        return Err(CacheError::NotFound(state.previous_theme.clone()).into());
    }

    // The rollback target may have been evicted since it was last active.
    let target = PathBuf::from(&state.previous_path);
    if !target.is_file() {
        app.renderer
            .status("Previous theme not in cache, downloading...");
        let theme = ThemeRef::parse(&state.previous_theme)?;
        let content = source
            .fetch_theme(&theme.author, &theme.name, &theme.version)
            .await?;
        validate::validate_content(&content)?;
        app.cache.put(&theme, &content)?;
    }

    // Swap the live pointer first; only a successful swap is recorded.
    app.activator.activate(&target)?;

    state.rollback();
    if let Err(e) = app.save_state(&state) {
        app.renderer
            .warn(&format!("Theme switched, but saving state failed: {e}"));
        app.renderer
            .warn("The recorded current/previous themes may be out of date.");
    }

    app.renderer
        .success(&format!("Rolled back to: {}", state.current_theme));
    Ok(())
}
