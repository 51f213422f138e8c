use std::sync::Arc;

use crate::config::Config;
use crate::store::Store;

/// Shared application state
///
/// The store is loaded once at startup and never mutated afterwards, so
/// handlers share it read-only without locking.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Store, config: Config) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }
}
