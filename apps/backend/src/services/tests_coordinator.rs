use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{GameConfig, RoundStartPolicy};
use crate::domain::scoring::{score_round, ScoreDeltas, ScoringEngine, SupportSnapshot};
use crate::domain::Phase;
use crate::errors::domain::{
    ConflictKind, DomainError, InfraErrorKind, NotFoundKind, StateKind, ValidationKind,
};
use crate::services::coordinator::GameCoordinator;

fn coordinator() -> GameCoordinator {
    GameCoordinator::new(&GameConfig::default())
}

/// Registers the names and returns their private ids in the same order.
fn join(game: &GameCoordinator, names: &[&str]) -> Vec<String> {
    names
        .iter()
        .map(|n| game.register_player(n).unwrap().private_id.to_string())
        .collect()
}

fn is_round_not_active(result: &Result<impl std::fmt::Debug, DomainError>) -> bool {
    matches!(result, Err(DomainError::State(StateKind::RoundNotActive, _)))
}

#[test]
fn first_registration_opens_round_one() {
    let game = coordinator();
    assert_eq!(game.current_phase().phase, Phase::Idle);
    assert_eq!(game.current_phase().round_number, 0);

    let status = game.register_player("Alice").unwrap();

    assert_eq!(status.round_number, 1);
    assert_eq!(status.phase, Phase::Active);
    assert_eq!(status.seconds_remaining, 120);
    assert_eq!(status.score, 0);
    assert!(status.other_players.is_empty());
    assert!(status.messages_received_this_round.is_empty());
}

#[test]
fn immediate_policy_opens_round_at_construction() {
    let config = GameConfig::default().with_start_policy(RoundStartPolicy::Immediate);
    let game = GameCoordinator::new(&config);

    assert_eq!(game.current_phase().phase, Phase::Active);
    assert_eq!(game.current_phase().round_number, 1);
    assert!(!game.start().unwrap());
}

#[test]
fn unrepresentable_round_duration_never_half_opens_a_round() {
    let config = GameConfig::default().with_round_duration(Duration::MAX);
    let game = GameCoordinator::new(&config);

    assert!(matches!(
        game.register_player("Alice"),
        Err(DomainError::Infra(InfraErrorKind::Other(_), _))
    ));
    assert_eq!(game.player_count(), 0);
    assert_eq!(game.current_phase().phase, Phase::Idle);
    assert_eq!(game.current_phase().round_number, 0);
    assert!(game.next_deadline().is_none());
    assert!(game.advance_round().is_err());
    assert_eq!(game.current_phase().phase, Phase::Idle);

    let boot = GameCoordinator::new(&config.with_start_policy(RoundStartPolicy::Immediate));
    assert_eq!(boot.current_phase().phase, Phase::Idle);
    assert!(boot.start().is_err());
}

#[test]
fn registration_errors() {
    let game = coordinator();
    join(&game, &["Alice"]);

    assert!(matches!(
        game.register_player("Alice"),
        Err(DomainError::Conflict(ConflictKind::DuplicateName, _))
    ));
    assert!(matches!(
        game.register_player(""),
        Err(DomainError::Validation(ValidationKind::InvalidPlayerName, _))
    ));
    assert_eq!(game.player_count(), 1);
}

#[test]
fn status_requires_a_valid_private_id() {
    let game = coordinator();
    join(&game, &["Alice"]);

    assert!(matches!(
        game.get_status("Alice"),
        Err(DomainError::NotFound(NotFoundKind::PrivateId, _))
    ));
}

#[test]
fn mutual_pair_with_one_way_supporter() {
    let game = coordinator();
    let ids = join(&game, &["Alice", "Bob", "Charlie"]);

    game.register_support(&ids[0], "Bob").unwrap();
    game.register_support(&ids[1], "Alice").unwrap();
    game.register_support(&ids[2], "Alice").unwrap();

    let board = game.advance_round().unwrap();

    assert_eq!(board.round_number, 1);
    assert_eq!(board.line("Alice").unwrap().delta, 4);
    assert_eq!(board.line("Bob").unwrap().delta, 3);
    assert_eq!(board.line("Charlie").unwrap().delta, -1);
    assert_eq!(
        board.line("Alice").unwrap().supporters_this_round,
        vec!["Bob".to_string(), "Charlie".to_string()]
    );

    let alice = game.get_status(&ids[0]).unwrap();
    assert_eq!(alice.score, 4);
    assert_eq!(alice.round_number, 2);
    assert_eq!(alice.supported_last_round.as_deref(), Some("Bob"));
    assert!(alice.other_players.iter().all(|o| o.supported_you_last_round));

    let bob = game.get_status(&ids[1]).unwrap();
    let charlie_view = bob
        .other_players
        .iter()
        .find(|o| o.player_name == "Charlie")
        .unwrap();
    assert!(!charlie_view.supported_you_last_round);
    assert_eq!(charlie_view.score, -1);
}

#[test]
fn support_chain_scores_only_the_tail() {
    let game = coordinator();
    let ids = join(&game, &["Alice", "Bob", "Charlie"]);

    game.register_support(&ids[0], "Bob").unwrap();
    game.register_support(&ids[1], "Charlie").unwrap();

    let board = game.advance_round().unwrap();

    assert_eq!(board.line("Alice").unwrap().delta, -1);
    assert_eq!(board.line("Bob").unwrap().delta, 0);
    assert_eq!(board.line("Charlie").unwrap().delta, 0);
    assert_eq!(board.line("Charlie").unwrap().supported, None);
}

#[test]
fn last_support_write_wins() {
    let game = coordinator();
    let ids = join(&game, &["Alice", "Bob", "Charlie"]);

    game.register_support(&ids[0], "Bob").unwrap();
    let status = game.register_support(&ids[0], "Charlie").unwrap();
    assert_eq!(status.supporting.as_deref(), Some("Charlie"));

    let board = game.advance_round().unwrap();
    assert_eq!(board.line("Alice").unwrap().supported.as_deref(), Some("Charlie"));
    assert!(board.line("Bob").unwrap().supporters_this_round.is_empty());
}

#[test]
fn rejected_calls_change_nothing() {
    let game = coordinator();
    let ids = join(&game, &["Alice", "Bob"]);
    game.register_support(&ids[0], "Bob").unwrap();
    let before = game.get_status(&ids[0]).unwrap();

    assert!(matches!(
        game.register_support(&ids[0], "Alice"),
        Err(DomainError::Validation(ValidationKind::SelfSupport, _))
    ));
    assert!(matches!(
        game.register_support(&ids[0], "Zed"),
        Err(DomainError::NotFound(NotFoundKind::Player, _))
    ));
    assert!(matches!(
        game.send_message(&ids[0], "Zed", "hi"),
        Err(DomainError::NotFound(NotFoundKind::Player, _))
    ));
    assert!(matches!(
        game.register_support("bogus", "Bob"),
        Err(DomainError::NotFound(NotFoundKind::PrivateId, _))
    ));

    let mut after = game.get_status(&ids[0]).unwrap();
    after.seconds_remaining = before.seconds_remaining;
    assert_eq!(after, before);
    assert!(game
        .get_status(&ids[1])
        .unwrap()
        .messages_received_this_round
        .is_empty());
}

#[test]
fn messages_live_for_exactly_one_round() {
    let game = coordinator();
    let ids = join(&game, &["Alice", "Bob"]);

    game.send_message(&ids[0], "Bob", "ally with me").unwrap();
    game.send_message(&ids[0], "Bob", "please").unwrap();

    let bob = game.get_status(&ids[1]).unwrap();
    let texts: Vec<_> = bob
        .messages_received_this_round
        .iter()
        .map(|m| (m.from.as_str(), m.message.as_str()))
        .collect();
    assert_eq!(texts, vec![("Alice", "ally with me"), ("Alice", "please")]);
    // reading again does not consume
    assert_eq!(game.get_status(&ids[1]).unwrap().messages_received_this_round.len(), 2);

    game.advance_round().unwrap();

    assert!(game
        .get_status(&ids[1])
        .unwrap()
        .messages_received_this_round
        .is_empty());
}

#[test]
fn support_resets_each_round_and_scores_accumulate() {
    let game = coordinator();
    let ids = join(&game, &["Alice", "Bob"]);

    game.register_support(&ids[0], "Bob").unwrap();
    game.register_support(&ids[1], "Alice").unwrap();
    game.advance_round().unwrap();

    assert!(game.get_status(&ids[0]).unwrap().supporting.is_none());

    // round 2: nobody chooses
    let board = game.advance_round().unwrap();
    assert_eq!(board.round_number, 2);
    assert_eq!(board.line("Alice").unwrap().delta, -1);
    assert_eq!(board.line("Alice").unwrap().score, 2);

    let alice = game.get_status(&ids[0]).unwrap();
    assert_eq!(alice.score, 2);
    assert_eq!(alice.round_number, 3);
    assert!(alice.supported_last_round.is_none());
    assert!(!alice.other_players[0].supported_you_last_round);
}

#[test]
fn forced_rollover_from_idle_scores_round_one() {
    let game = coordinator();

    let board = game.advance_round().unwrap();

    assert_eq!(board.round_number, 1);
    assert!(board.scores.is_empty());
    assert_eq!(game.current_phase().round_number, 2);
    assert_eq!(game.current_phase().phase, Phase::Active);
}

#[test]
fn timer_rollover_waits_for_deadline() {
    let config = GameConfig::default().with_round_duration(Duration::from_secs(3600));
    let game = GameCoordinator::new(&config);
    join(&game, &["Alice"]);

    assert_eq!(game.rollover_if_due().unwrap(), None);
    assert_eq!(game.current_phase().round_number, 1);
    assert!(game.last_scoreboard().is_none());
}

#[test]
fn late_joiner_scores_as_silent() {
    let game = coordinator();
    let ids = join(&game, &["Alice", "Bob"]);
    game.register_support(&ids[0], "Bob").unwrap();
    game.register_support(&ids[1], "Alice").unwrap();

    let late = game.register_player("Late").unwrap();
    assert_eq!(late.round_number, 1);

    let board = game.advance_round().unwrap();
    assert_eq!(board.line("Late").unwrap().delta, -1);
    assert_eq!(game.last_scoreboard(), Some(board));
}

/// Fails until told otherwise, then scores normally.
struct FlakyScoring {
    healthy: Arc<AtomicBool>,
}

impl ScoringEngine for FlakyScoring {
    fn score(&self, support: &SupportSnapshot) -> Result<ScoreDeltas, DomainError> {
        if self.healthy.load(Ordering::SeqCst) {
            score_round(support)
        } else {
            Err(DomainError::infra(
                InfraErrorKind::DataCorruption,
                "scoring unavailable",
            ))
        }
    }
}

#[test]
fn failed_scoring_keeps_round_frozen_until_retry() {
    let healthy = Arc::new(AtomicBool::new(false));
    let game = GameCoordinator::with_engine(
        &GameConfig::default(),
        Box::new(FlakyScoring {
            healthy: healthy.clone(),
        }),
    );
    let ids = join(&game, &["Alice", "Bob"]);
    game.register_support(&ids[0], "Bob").unwrap();
    game.register_support(&ids[1], "Alice").unwrap();
    game.send_message(&ids[0], "Bob", "deal").unwrap();

    assert!(matches!(
        game.advance_round(),
        Err(DomainError::Infra(InfraErrorKind::DataCorruption, _))
    ));

    // frozen, readable, closed for writes
    let frozen = game.pending_snapshot().unwrap();
    assert_eq!(frozen.round_number, 1);
    assert_eq!(frozen.support["Alice"].as_deref(), Some("Bob"));
    assert_eq!(game.current_phase().phase, Phase::Scoring);
    assert!(game.next_deadline().is_none());
    assert!(is_round_not_active(&game.register_support(&ids[0], "Bob")));
    assert!(is_round_not_active(&game.send_message(&ids[1], "Alice", "x")));
    let bob = game.get_status(&ids[1]).unwrap();
    assert_eq!(bob.phase, Phase::Scoring);
    assert_eq!(bob.score, 0);
    assert_eq!(bob.messages_received_this_round.len(), 1);
    // the timer leaves a stuck round alone
    assert_eq!(game.rollover_if_due().unwrap(), None);

    healthy.store(true, Ordering::SeqCst);
    let board = game.advance_round().unwrap();

    assert_eq!(board.round_number, 1);
    assert_eq!(board.line("Alice").unwrap().delta, 3);
    assert!(game.pending_snapshot().is_none());
    assert_eq!(game.current_phase().round_number, 2);
    assert_eq!(game.current_phase().phase, Phase::Active);
}
