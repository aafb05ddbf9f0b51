use serde::Serialize;

use crate::domain::scoring::{supporters_by_target, ScoreDeltas, SupportSnapshot};

/// Result of one rollover, sorted by player name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scoreboard {
    pub round_number: u32,
    pub scores: Vec<ScoreLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreLine {
    pub player_name: String,
    /// Cumulative score after this round's delta was applied.
    pub score: i64,
    pub delta: i64,
    pub supported: Option<String>,
    pub supporters_this_round: Vec<String>,
}

impl Scoreboard {
    /// `score_of` resolves the post-round cumulative score for a participant.
    pub fn build(
        round_number: u32,
        support: &SupportSnapshot,
        deltas: &ScoreDeltas,
        score_of: impl Fn(&str) -> i64,
    ) -> Self {
        let supporters = supporters_by_target(support);
        let scores = support
            .iter()
            .map(|(name, target)| ScoreLine {
                player_name: name.clone(),
                score: score_of(name),
                delta: deltas.get(name).unwrap_or(0),
                supported: target.clone(),
                supporters_this_round: supporters
                    .get(name.as_str())
                    .map(|v| v.iter().map(|s| s.to_string()).collect())
                    .unwrap_or_default(),
            })
            .collect();

        Self {
            round_number,
            scores,
        }
    }

    pub fn line(&self, player_name: &str) -> Option<&ScoreLine> {
        self.scores.iter().find(|l| l.player_name == player_name)
    }
}
