//! Current-round support choices: plain overwrite, last write wins.

use std::collections::HashMap;

use crate::domain::scoring::SupportSnapshot;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::services::registry::PlayerRegistry;
use crate::services::round_controller::MutationGuard;

#[derive(Debug, Default)]
pub struct SupportLedger {
    choices: HashMap<String, String>,
}

impl SupportLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `player`'s choice for the running round, replacing any earlier one.
    pub fn set_support(
        &mut self,
        _guard: &MutationGuard,
        registry: &PlayerRegistry,
        player: &str,
        target: &str,
    ) -> Result<(), DomainError> {
        if target == player {
            return Err(DomainError::validation(
                ValidationKind::SelfSupport,
                "You cannot support yourself",
            ));
        }
        registry.lookup_by_name(target)?;

        self.choices.insert(player.to_string(), target.to_string());
        Ok(())
    }

    pub fn choice_of(&self, player: &str) -> Option<&str> {
        self.choices.get(player).map(String::as_str)
    }

    /// Every registered player with their final choice; `None` if they made none.
    pub fn snapshot_all(&self, registry: &PlayerRegistry) -> SupportSnapshot {
        registry
            .names()
            .map(|name| (name.to_string(), self.choices.get(name).cloned()))
            .collect()
    }

    pub fn reset(&mut self) {
        self.choices.clear();
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}
