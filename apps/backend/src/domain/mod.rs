//! Domain layer: pure game types and rules.

pub mod player;
pub mod round;
pub mod scoreboard;
pub mod scoring;

#[cfg(test)]
mod tests_scoring;

// Re-exports for ergonomics
pub use player::{validate_player_name, Player, PrivateId};
pub use round::{Phase, RoundView};
pub use scoreboard::{ScoreLine, Scoreboard};
pub use scoring::{score_round, AllianceScoring, ScoreDeltas, ScoringEngine, SupportSnapshot};
