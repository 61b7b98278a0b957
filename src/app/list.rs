//! `nebula list` — show cached themes, marking the active one.

use std::path::Path;

use crate::cache::{same_file, CacheIndex};
use crate::error::CliError;

use super::App;

pub fn run(app: &App) -> Result<(), CliError> {
    let state = app.load_state().unwrap_or_default();
    let themes = app.cache.list()?;

    if themes.is_empty() {
        app.renderer.warn("No themes cached yet");
        app.renderer
            .status("Download one with: nebula apply <author>/<theme>");
        return Ok(());
    }

    let active = (!state.current_path.is_empty()).then(|| Path::new(&state.current_path));

    app.renderer
        .section(&format!("Cached themes ({}):", themes.len()));
    for theme in &themes {
        let entry = app.cache.entry_path(theme);
        let is_active = active.is_some_and(|active| same_file(&entry, active));
        if is_active {
            app.renderer
                .line_highlighted(&format!("  * {theme} (current)"));
        } else {
            app.renderer.line(&format!("    {theme}"));
        }
    }
    Ok(())
}
