//! Player registry: identity lookup and cumulative score bookkeeping.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::player::{validate_player_name, Player, PrivateId};
use crate::domain::scoring::{supporters_by_target, ScoreDeltas, SupportSnapshot};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};

/// Players in registration order, indexed by name and by private id.
///
/// Players are never removed, so indices stay valid for the process lifetime.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    players: Vec<Player>,
    by_name: HashMap<String, usize>,
    by_private_id: HashMap<PrivateId, usize>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` (exact, case-sensitive match for uniqueness).
    pub fn register(&mut self, name: &str) -> Result<&Player, DomainError> {
        validate_player_name(name)?;
        if self.by_name.contains_key(name) {
            return Err(DomainError::conflict(
                ConflictKind::DuplicateName,
                format!("Player '{name}' already exists"),
            ));
        }

        let mut private_id = PrivateId::generate();
        while self.by_private_id.contains_key(&private_id) {
            private_id = PrivateId::generate();
        }

        let idx = self.players.len();
        self.by_name.insert(name.to_string(), idx);
        self.by_private_id.insert(private_id.clone(), idx);
        self.players.push(Player::new(name, private_id));
        debug!(player = name, players = self.players.len(), "Player registered");

        Ok(&self.players[idx])
    }

    pub fn lookup(&self, private_id: &str) -> Result<&Player, DomainError> {
        self.by_private_id
            .get(private_id)
            .map(|&idx| &self.players[idx])
            .ok_or_else(|| DomainError::not_found(NotFoundKind::PrivateId, "Unknown private_id"))
    }

    pub fn lookup_by_name(&self, name: &str) -> Result<&Player, DomainError> {
        self.by_name
            .get(name)
            .map(|&idx| &self.players[idx])
            .ok_or_else(|| {
                DomainError::not_found(NotFoundKind::Player, format!("Unknown player '{name}'"))
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Add each delta to the named player's cumulative score.
    ///
    /// Only the rollover path calls this, once per round.
    pub fn apply_score_deltas(&mut self, deltas: &ScoreDeltas) {
        for (name, delta) in deltas.iter() {
            if let Some(&idx) = self.by_name.get(name) {
                self.players[idx].score += delta;
            }
        }
    }

    /// Replace every player's last-round projections from the scored snapshot.
    ///
    /// Players absent from the snapshot (registered after it was frozen) get
    /// empty projections.
    pub fn record_last_round(&mut self, support: &SupportSnapshot) {
        let supporters = supporters_by_target(support);
        for player in &mut self.players {
            player.supported_last_round = support.get(&player.name).cloned().flatten();
            player.supporters_last_round = supporters
                .get(player.name.as_str())
                .map(|names| names.iter().map(|n| n.to_string()).collect())
                .unwrap_or_default();
        }
    }

    pub fn score_of(&self, name: &str) -> Option<i64> {
        self.by_name.get(name).map(|&idx| self.players[idx].score)
    }

    /// Registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.players.iter().map(|p| p.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
