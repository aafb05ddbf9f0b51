//! Player identity and score bookkeeping types.

use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::domain::{DomainError, ValidationKind};

pub const MAX_NAME_LEN: usize = 64;

/// Opaque capability token issued once at registration.
///
/// Random v4 UUID text; it carries no information about the player name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrivateId(String);

impl PrivateId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Lets registry maps keyed by `PrivateId` be queried with caller-supplied `&str`.
impl Borrow<str> for PrivateId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrivateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub private_id: PrivateId,
    pub score: i64,
    /// Target of this player's final choice in the last scored round.
    pub supported_last_round: Option<String>,
    /// Players whose final choice in the last scored round was this player.
    pub supporters_last_round: BTreeSet<String>,
}

impl Player {
    pub fn new(name: impl Into<String>, private_id: PrivateId) -> Self {
        Self {
            name: name.into(),
            private_id,
            score: 0,
            supported_last_round: None,
            supporters_last_round: BTreeSet::new(),
        }
    }
}

/// Names are stored exactly as given; this only rejects unusable ones.
pub fn validate_player_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::validation(
            ValidationKind::InvalidPlayerName,
            "Player name must not be empty",
        ));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::validation(
            ValidationKind::InvalidPlayerName,
            format!("Player name must be at most {MAX_NAME_LEN} characters"),
        ));
    }
    if name.chars().any(char::is_control) {
        return Err(DomainError::validation(
            ValidationKind::InvalidPlayerName,
            "Player name must not contain control characters",
        ));
    }
    Ok(())
}
