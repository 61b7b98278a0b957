//! Command handlers.
//!
//! Every handler receives an [`App`] context built once at startup instead
//! of reading process-wide globals, so the loaded layout, cache, and hub
//! wiring stay explicit and testable.

pub mod apply;
pub mod clean;
pub mod current;
pub mod info;
pub mod list;
pub mod preview;
pub mod remove;
pub mod rollback;
pub mod update;

use crate::activate::Activator;
use crate::api::HubClient;
use crate::cache::CacheStore;
use crate::error::StateError;
use crate::paths::Layout;
use crate::render::Renderer;
use crate::state::State;

/// Shared context threaded through command handlers.
#[derive(Debug, Clone)]
pub struct App {
    pub renderer: Renderer,
    pub layout: Layout,
    pub cache: CacheStore,
    pub activator: Activator,
    pub hub: HubClient,
}

impl App {
    /// Wire up the context for a resolved layout.
    pub fn new(layout: Layout, renderer: Renderer, hub: HubClient) -> Self {
        let cache = CacheStore::new(&layout.cache_root);
        let activator = Activator::new(&layout.live_config, &layout.backup_file);
        Self {
            renderer,
            layout,
            cache,
            activator,
            hub,
        }
    }

    pub fn load_state(&self) -> Result<State, StateError> {
        State::load(&self.layout.state_file)
    }

    pub fn save_state(&self, state: &State) -> Result<(), StateError> {
        state.save(&self.layout.state_file)
    }
}
