//! `nebula info` — show hub metadata for a theme.

use crate::error::CliError;
use crate::theme::ThemeRef;

use super::App;

pub async fn run(app: &App, identifier: &str) -> Result<(), CliError> {
    let theme = ThemeRef::parse(identifier)?;
    let info = app.hub.theme_info(&theme.author, &theme.name).await?;

    app.renderer.section(&info.name);
    app.renderer.field("author", &info.author.name);
    app.renderer.field("slug", &info.slug);
    if !info.description.is_empty() {
        app.renderer.field("about", &info.description);
    }
    app.renderer.field("downloads", &info.downloads.to_string());

    if !info.versions.is_empty() {
        app.renderer
            .section(&format!("Versions ({}):", info.versions.len()));
        for version in &info.versions {
            if version.version_notes.is_empty() {
                app.renderer.line(&format!("  - {}", version.version));
            } else {
                app.renderer
                    .line(&format!("  - {} ({})", version.version, version.version_notes));
            }
        }

        let latest = &info.versions[0];
        if !latest.dependencies.is_empty() {
            app.renderer.section("Dependencies:");
            for dependency in &latest.dependencies {
                app.renderer.line(&format!("  - {dependency}"));
            }
        }
    }

    app.renderer.status(&format!(
        "Install with: nebula apply {}/{}",
        theme.author, theme.name
    ));
    Ok(())
}
