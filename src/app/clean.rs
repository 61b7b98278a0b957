//! `nebula clean` — batch-delete cached themes.

use std::path::PathBuf;

use crate::error::CliError;

use super::App;

pub fn run(app: &App, all: bool) -> Result<(), CliError> {
    let state = app.load_state().unwrap_or_default();

    let exclude =
        (!all && !state.current_path.is_empty()).then(|| PathBuf::from(&state.current_path));
    let removed = app.cache.clean(exclude.as_deref())?;

    if removed == 0 {
        app.renderer.warn("Cache already clean");
        return Ok(());
    }

    app.renderer
        .success(&format!("Cleaned cache: removed {removed} theme(s)"));
    if exclude.is_some() && !state.current_theme.is_empty() {
        app.renderer
            .line(&format!("Kept current theme: {}", state.current_theme));
    }
    Ok(())
}
