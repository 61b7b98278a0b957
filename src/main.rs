//! CLI entry point for nebula.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use nebula::api::{HubClient, DEFAULT_HUB_URL};
use nebula::app::{self, App};
use nebula::cli::{Args, Command};
use nebula::error::CliError;
use nebula::paths::Layout;
use nebula::render::Renderer;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nebula=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let renderer = Renderer::new(!args.no_color);

    let Some(layout) = Layout::resolve() else {
        renderer.error("unable to resolve a home directory for the theme cache");
        std::process::exit(1);
    };
    if let Err(e) = layout.ensure() {
        renderer.error(&format!("failed to initialize {}: {e}", layout.cache_root.display()));
        std::process::exit(1);
    }

    let hub = HubClient::new(args.hub_url.as_deref().unwrap_or(DEFAULT_HUB_URL));
    let app = App::new(layout, renderer, hub);

    if let Err(e) = dispatch(&app, args.command).await {
        app.renderer.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn dispatch(app: &App, command: Command) -> Result<(), CliError> {
    match command {
        Command::Apply { identifier, force } => {
            app::apply::run(app, &app.hub, &identifier, force).await
        }
        Command::Preview { identifier } => app::preview::run(app, &app.hub, &identifier).await,
        Command::List => app::list::run(app),
        Command::Current => app::current::run(app),
        Command::Rollback => app::rollback::run(app, &app.hub).await,
        Command::Remove {
            identifier,
            all_versions,
            force,
        } => app::remove::run(app, &identifier, all_versions, force),
        Command::Clean { all } => app::clean::run(app, all),
        Command::Info { identifier } => app::info::run(app, &identifier).await,
        Command::Update => app::update::run(app).await,
    }
}
