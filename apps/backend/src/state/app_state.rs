use std::sync::Arc;

use crate::config::GameConfig;
use crate::services::GameCoordinator;

/// Shared handler state: the one coordinator for this process and the
/// configuration it was built from.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<GameCoordinator>,
    pub config: GameConfig,
}

impl AppState {
    pub fn new(coordinator: Arc<GameCoordinator>, config: GameConfig) -> Self {
        Self {
            coordinator,
            config,
        }
    }

    /// State around a fresh coordinator with default configuration.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        let config = GameConfig::default();
        Self::new(Arc::new(GameCoordinator::new(&config)), config)
    }
}
