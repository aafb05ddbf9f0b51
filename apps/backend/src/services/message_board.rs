//! Current-round private inboxes.

use std::collections::HashMap;

use serde::Serialize;

use crate::errors::domain::DomainError;
use crate::services::registry::PlayerRegistry;
use crate::services::round_controller::MutationGuard;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InboxMessage {
    pub from: String,
    pub message: String,
}

/// Append-only per round; no dedup or rate limit.
#[derive(Debug, Default)]
pub struct MessageBoard {
    inboxes: HashMap<String, Vec<InboxMessage>>,
}

impl MessageBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(
        &mut self,
        _guard: &MutationGuard,
        registry: &PlayerRegistry,
        from: &str,
        to: &str,
        text: &str,
    ) -> Result<(), DomainError> {
        registry.lookup_by_name(to)?;
        self.inboxes
            .entry(to.to_string())
            .or_default()
            .push(InboxMessage {
                from: from.to_string(),
                message: text.to_string(),
            });
        Ok(())
    }

    /// Messages received this round in send order. Reading does not consume.
    pub fn inbox_of(&self, name: &str) -> &[InboxMessage] {
        self.inboxes
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Empty every inbox; allocations are kept for the next round.
    pub fn reset(&mut self) {
        for inbox in self.inboxes.values_mut() {
            inbox.clear();
        }
    }

    pub fn total_messages(&self) -> usize {
        self.inboxes.values().map(Vec::len).sum()
    }
}
