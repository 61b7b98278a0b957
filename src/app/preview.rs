//! `nebula preview` — open a theme in a throwaway terminal window.
//!
//! The spawned shell gets `STARSHIP_CONFIG` pointed at the cached file, so
//! the user's live configuration is never touched.

use std::path::Path;

use crate::api::ThemeSource;
use crate::cache::CacheIndex;
use crate::error::CliError;
use crate::theme::ThemeRef;
use crate::validate;

use super::App;

pub async fn run(app: &App, source: &dyn ThemeSource, identifier: &str) -> Result<(), CliError> {
    let mut theme = ThemeRef::parse(identifier)?;

    if !theme.version_explicit {
        if let Some(newest) = app.cache.newest_local_version(&theme) {
            theme = theme.with_version(&newest);
        }
    }

    if !app.cache.exists(&theme) {
        app.renderer.status(&format!("Downloading {theme}..."));
        let content = source
            .fetch_theme(&theme.author, &theme.name, &theme.version)
            .await?;
        validate::validate_content(&content)?;
        app.cache.put(&theme, &content)?;
    }

    let theme_path = app.cache.entry_path(&theme);
    spawn_terminal(&theme_path).map_err(CliError::Preview)?;

    app.renderer.success("Preview opened in a new window");
    app.renderer.status(&format!("Theme: {theme}"));
    Ok(())
}

fn login_shell() -> String {
    std::env::var("SHELL")
        .ok()
        .filter(|shell| !shell.trim().is_empty())
        .unwrap_or_else(|| "/bin/bash".to_string())
}

#[cfg(target_os = "macos")]
fn spawn_terminal(config_path: &Path) -> Result<(), String> {
    let shell = login_shell();
    let script = format!(
        "tell application \"Terminal\"\n\
         do script \"export STARSHIP_CONFIG='{}' && exec {shell} -l\"\n\
         activate\n\
         end tell",
        config_path.display()
    );
    std::process::Command::new("osascript")
        .arg("-e")
        .arg(script)
        .spawn()
        .map(|_| ())
        .map_err(|e| format!("failed to launch Terminal.app: {e}"))
}

#[cfg(target_os = "linux")]
fn spawn_terminal(config_path: &Path) -> Result<(), String> {
    // First launcher that spawns wins; a missing binary just moves on to the
    // next candidate.
    const TERMINALS: &[(&str, &[&str])] = &[
        ("wezterm", &["start", "--"]),
        ("alacritty", &["-e"]),
        ("ghostty", &["-e"]),
        ("kitty", &["-e"]),
        ("foot", &[]),
        ("gnome-terminal", &["--"]),
        ("konsole", &["-e"]),
        ("xfce4-terminal", &["-e"]),
        ("xterm", &["-e"]),
    ];

    let shell = login_shell();
    for (terminal, args) in TERMINALS {
        let spawned = std::process::Command::new(terminal)
            .args(*args)
            .arg(&shell)
            .arg("-l")
            .env("STARSHIP_CONFIG", config_path)
            .env("STARSHIP_LOG", "error")
            .spawn();
        if spawned.is_ok() {
            return Ok(());
        }
    }
    Err("no supported terminal could be launched".to_string())
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn spawn_terminal(_config_path: &Path) -> Result<(), String> {
    Err(format!("unsupported platform: {}", std::env::consts::OS))
}
