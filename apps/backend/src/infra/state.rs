use std::sync::Arc;

use tracing::info;

use crate::config::GameConfig;
use crate::domain::scoring::{AllianceScoring, ScoringEngine};
use crate::error::AppError;
use crate::services::GameCoordinator;
use crate::state::app_state::AppState;

/// Builder for `AppState`, used by `main.rs` and the integration tests.
pub struct StateBuilder {
    config: GameConfig,
    engine: Option<Box<dyn ScoringEngine>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            config: GameConfig::default(),
            engine: None,
        }
    }

    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_engine(mut self, engine: Box<dyn ScoringEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn build(self) -> Result<AppState, AppError> {
        self.config.validate()?;

        let engine = self.engine.unwrap_or_else(|| Box::new(AllianceScoring));
        let coordinator = GameCoordinator::with_engine(&self.config, engine);
        info!(
            round_seconds = self.config.round_duration.as_secs(),
            start_policy = ?self.config.start_policy,
            admin_enabled = self.config.admin_enabled,
            "Game coordinator ready"
        );
        Ok(AppState::new(Arc::new(coordinator), self.config))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
