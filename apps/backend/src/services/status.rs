//! Read-only per-player projection of the whole game.
//!
//! Callers build it while holding the coordinator lock, so a status never
//! mixes pre- and post-rollover state.

use serde::Serialize;

use crate::domain::player::{Player, PrivateId};
use crate::domain::round::{Phase, RoundView};
use crate::services::message_board::{InboxMessage, MessageBoard};
use crate::services::registry::PlayerRegistry;
use crate::services::support_ledger::SupportLedger;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerStatus {
    pub player_name: String,
    pub private_id: PrivateId,
    pub score: i64,
    pub round_number: u32,
    pub phase: Phase,
    pub seconds_remaining: u64,
    /// Own choice in the running round, if any.
    pub supporting: Option<String>,
    pub supported_last_round: Option<String>,
    pub other_players: Vec<OtherPlayerView>,
    pub messages_received_this_round: Vec<InboxMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OtherPlayerView {
    pub player_name: String,
    pub score: i64,
    pub supported_you_last_round: bool,
}

pub struct StatusProjector<'a> {
    pub registry: &'a PlayerRegistry,
    pub ledger: &'a SupportLedger,
    pub board: &'a MessageBoard,
    pub round: RoundView,
}

impl StatusProjector<'_> {
    pub fn snapshot(&self, player: &Player) -> PlayerStatus {
        let other_players = self
            .registry
            .iter()
            .filter(|other| other.name != player.name)
            .map(|other| OtherPlayerView {
                player_name: other.name.clone(),
                score: other.score,
                supported_you_last_round: player.supporters_last_round.contains(&other.name),
            })
            .collect();

        PlayerStatus {
            player_name: player.name.clone(),
            private_id: player.private_id.clone(),
            score: player.score,
            round_number: self.round.round_number,
            phase: self.round.phase,
            seconds_remaining: self.round.seconds_remaining,
            supporting: self.ledger.choice_of(&player.name).map(str::to_string),
            supported_last_round: player.supported_last_round.clone(),
            other_players,
            messages_received_this_round: self.board.inbox_of(&player.name).to_vec(),
        }
    }
}
