//! Nebula — a theme manager for the Starship prompt.
//!
//! Themes are addressed as `author/name[@version]`, cached under the user's
//! config directory, and activated by atomically re-pointing a symlink at
//! `~/.config/starship.toml`. A small JSON state record tracks the current
//! and previous theme so any activation can be rolled back.
//!
//! # Quick start
//!
//! ```no_run
//! use nebula::api::HubClient;
//! use nebula::app::{self, App};
//! use nebula::paths::Layout;
//! use nebula::render::Renderer;
//!
//! # async fn example() {
//! let layout = Layout::resolve().unwrap();
//! layout.ensure().unwrap();
//! let app = App::new(layout, Renderer::new(true), HubClient::new(nebula::api::DEFAULT_HUB_URL));
//! app::list::run(&app).unwrap();
//! # }
//! ```

pub mod activate;
pub mod api;
pub mod app;
pub mod build_info;
pub mod cache;
pub mod cli;
pub mod error;
pub mod paths;
pub mod render;
pub mod state;
#[cfg(test)]
pub mod testsupport;
pub mod theme;
pub mod validate;
