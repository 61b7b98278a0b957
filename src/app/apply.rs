//! `nebula apply` — resolve, download, validate, and activate a theme.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use tracing::debug;

use crate::api::ThemeSource;
use crate::build_info;
use crate::cache::CacheIndex;
use crate::error::CliError;
use crate::theme::ThemeRef;
use crate::validate;

use super::App;

/// Cap on the best-effort download-count notification. The notification may
/// be slow or down; it must never hold up the activation result.
const DOWNLOAD_COUNT_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn run(
    app: &App,
    source: &dyn ThemeSource,
    identifier: &str,
    force: bool,
) -> Result<(), CliError> {
    let mut theme = ThemeRef::parse(identifier)?;
    let mut state = app.load_state()?;

    // An unpinned identifier prefers what is already cached: the newest
    // concrete version if one exists, the hub's `latest` otherwise.
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
        let report = validate::validate_content(&content)?;

        if report.has_custom_commands && !force {
            app.renderer.warn("SECURITY WARNING");
            app.renderer.warn(
                "This theme contains [custom] commands that can execute arbitrary shell code \
                 every time Starship renders your prompt.",
            );
            if !confirm("Do you trust this theme and want to apply it?") {
                app.renderer.warn("Aborted. Theme was not applied.");
                return Ok(());
            }
        }

        app.cache.put(&theme, &content)?;

        let theme_id = theme.id();
        if !build_info::is_dev_build() && !state.has_downloaded(&theme_id) {
            notify_download(source, &theme).await;
        }
        state.mark_downloaded(&theme_id);
    }

    let theme_path = app.cache.entry_path(&theme);

    // Activation must succeed before the state record changes; a failed swap
    // leaves both the live path and the record as they were.
    let backup = app.activator.activate(&theme_path)?;

    state.apply(&theme.to_string(), &theme_path.to_string_lossy());
    if let Err(e) = app.save_state(&state) {
        // The swap already happened, so this is a partial success: the theme
        // is live but the rollback record may be stale.
        app.renderer
            .warn(&format!("Theme applied, but saving state failed: {e}"));
        app.renderer
            .warn("Rollback information may be out of date.");
    }

    if let Some(backup) = backup {
        app.renderer
            .warn("Your original starship.toml has been backed up to:");
        app.renderer.warn(&format!("  {}", backup.display()));
        app.renderer.status(&format!(
            "Apply it again later with: nebula apply {}",
            app.layout.backup_identifier()
        ));
    }

    app.renderer.success(&format!("Applied {theme}"));
    Ok(())
}

/// Report the download to the hub, bounded and best-effort.
async fn notify_download(source: &dyn ThemeSource, theme: &ThemeRef) {
    let notify = source.record_download(&theme.author, &theme.name);
    match tokio::time::timeout(DOWNLOAD_COUNT_TIMEOUT, notify).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => debug!(theme = %theme, error = %e, "download count not recorded"),
        Err(_) => debug!(theme = %theme, "download count notification timed out"),
    }
}

/// Ask for confirmation on stdin, defaulting to No.
fn confirm(prompt: &str) -> bool {
    eprint!("{prompt} [y/N]: ");
    let _ = io::stderr().flush();
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
