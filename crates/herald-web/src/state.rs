//! Application state.

use herald_core::{HubConfig, PushHub};
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub hub: Arc<PushHub>,
}

impl AppState {
    pub fn new(config: HubConfig) -> Self {
        Self {
            hub: Arc::new(PushHub::new(config)),
        }
    }
}
