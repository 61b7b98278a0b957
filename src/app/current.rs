//! `nebula current` — show the active theme and cross-check the symlink.

use std::path::Path;

use crate::error::CliError;

use super::App;

pub fn run(app: &App) -> Result<(), CliError> {
    let state = app.load_state()?;

    if state.current_theme.is_empty() {
        app.renderer.warn("No theme currently applied");
        app.renderer
            .status("Apply one with: nebula apply <author>/<theme>");
        return Ok(());
    }

    // The record is only eventually consistent with the filesystem; report
    // drift instead of failing.
    let target = match app.activator.current_target() {
        Ok(target) => target,
        Err(e) => {
            app.renderer.error(&e.to_string());
            app.renderer
                .line(&format!("State says: {}", state.current_theme));
            app.renderer
                .status(&format!("Re-apply with: nebula apply {}", state.current_theme));
            return Ok(());
        }
    };

    if !Path::new(&target).is_file() {
        app.renderer.error("theme file missing");
        app.renderer.field("theme", &state.current_theme);
        app.renderer.field("expected", &state.current_path);
        app.renderer.status(&format!(
            "Re-download with: nebula apply {}",
            state.current_theme
        ));
        return Ok(());
    }

    app.renderer.section("Current theme");
    app.renderer.field("theme", &state.current_theme);
    app.renderer.field("path", &state.current_path);
    app.renderer
        .field("config", &app.activator.live_path().display().to_string());
    Ok(())
}
