//! Round scoring: converts the frozen support graph into score deltas.
//!
//! Rules, applied per player `p`:
//! - +1 for every player whose final choice was `p`
//! - +2 when `p`'s target chose `p` back (mutual alliance)
//! - -1 when `p`'s target chose someone else or nobody
//! - -1 when `p` chose nobody
//!
//! There is no clamping and no normalisation; the sum of all deltas is not
//! zero because the no-support penalty has no matching credit.

use std::collections::BTreeMap;

use crate::errors::domain::{DomainError, InfraErrorKind};

/// Final choices of a round: every participant maps to their target, if any.
pub type SupportSnapshot = BTreeMap<String, Option<String>>;

pub const SUPPORT_RECEIVED: i64 = 1;
pub const MUTUAL_BONUS: i64 = 2;
pub const UNRECIPROCATED_PENALTY: i64 = -1;
pub const NO_SUPPORT_PENALTY: i64 = -1;

/// Per-player score change for one round, keyed by player name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreDeltas(BTreeMap<String, i64>);

impl ScoreDeltas {
    pub fn get(&self, name: &str) -> Option<i64> {
        self.0.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(name, delta)| (name.as_str(), *delta))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> i64 {
        self.0.values().sum()
    }
}

impl FromIterator<(String, i64)> for ScoreDeltas {
    fn from_iter<T: IntoIterator<Item = (String, i64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Scoring seam used by the coordinator at rollover.
pub trait ScoringEngine: Send + Sync {
    fn score(&self, support: &SupportSnapshot) -> Result<ScoreDeltas, DomainError>;
}

/// The standard single-target support rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllianceScoring;

impl ScoringEngine for AllianceScoring {
    fn score(&self, support: &SupportSnapshot) -> Result<ScoreDeltas, DomainError> {
        score_round(support)
    }
}

/// Score one frozen round.
///
/// Fails with `DataCorruption` if a target is not itself a participant or a
/// player targets itself; the live ledger never produces either.
pub fn score_round(support: &SupportSnapshot) -> Result<ScoreDeltas, DomainError> {
    let mut received: BTreeMap<&str, i64> =
        support.keys().map(|name| (name.as_str(), 0)).collect();

    for (supporter, target) in support {
        let Some(target) = target else { continue };
        if target == supporter {
            return Err(DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("'{supporter}' supports itself in the frozen round"),
            ));
        }
        match received.get_mut(target.as_str()) {
            Some(count) => *count += 1,
            None => {
                return Err(DomainError::infra(
                    InfraErrorKind::DataCorruption,
                    format!("'{supporter}' supports '{target}', who is not in the frozen round"),
                ))
            }
        }
    }

    let deltas = support
        .iter()
        .map(|(player, target)| {
            let mut delta = received[player.as_str()] * SUPPORT_RECEIVED;
            delta += match target {
                Some(t) if support.get(t).and_then(Option::as_deref) == Some(player.as_str()) => {
                    MUTUAL_BONUS
                }
                Some(_) => UNRECIPROCATED_PENALTY,
                None => NO_SUPPORT_PENALTY,
            };
            (player.clone(), delta)
        })
        .collect();

    Ok(deltas)
}

/// Who chose each player, derived from the same snapshot that was scored.
pub fn supporters_by_target(support: &SupportSnapshot) -> BTreeMap<&str, Vec<&str>> {
    let mut by_target: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (supporter, target) in support {
        if let Some(target) = target {
            by_target
                .entry(target.as_str())
                .or_default()
                .push(supporter.as_str());
        }
    }
    by_target
}
