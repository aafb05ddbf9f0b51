//! Round phase and timing types.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

pub const DEFAULT_ROUND_SECONDS: u64 = 120;
/// One day.
pub const MAX_ROUND_SECONDS: u64 = 86_400;

/// `Idle` only precedes round 1; afterwards the game cycles
/// `Active -> Scoring -> Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Active,
    Scoring,
}

impl Phase {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Active => "active",
            Phase::Scoring => "scoring",
        }
    }
}

/// Point-in-time view of the round clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoundView {
    pub round_number: u32,
    pub phase: Phase,
    pub seconds_remaining: u64,
}

/// Whole seconds left until `deadline`, rounded up so a fresh round reports
/// its full duration.
pub fn seconds_until(deadline: Instant, now: Instant) -> u64 {
    let left = deadline.saturating_duration_since(now);
    let secs = left.as_secs();
    if left.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}

pub fn default_round_duration() -> Duration {
    Duration::from_secs(DEFAULT_ROUND_SECONDS)
}
