use std::sync::Barrier;
use std::thread;

use crate::config::GameConfig;
use crate::domain::Phase;
use crate::errors::domain::{ConflictKind, DomainError, StateKind};
use crate::services::coordinator::GameCoordinator;

const PLAYERS: usize = 16;

fn name(i: usize) -> String {
    format!("p{i}")
}

fn target(i: usize) -> String {
    name((i + 1) % PLAYERS)
}

fn setup() -> (GameCoordinator, Vec<String>) {
    let game = GameCoordinator::new(&GameConfig::default());
    let ids = (0..PLAYERS)
        .map(|i| game.register_player(&name(i)).unwrap().private_id.to_string())
        .collect();
    (game, ids)
}

#[test]
fn supports_racing_a_rollover_land_in_exactly_the_round_they_reported() {
    for _ in 0..25 {
        let (game, ids) = setup();
        let barrier = Barrier::new(PLAYERS + 1);

        let (outcomes, board) = thread::scope(|s| {
            let writers: Vec<_> = (0..PLAYERS)
                .map(|i| {
                    let (game, ids, barrier) = (&game, &ids, &barrier);
                    s.spawn(move || {
                        barrier.wait();
                        game.register_support(&ids[i], &target(i))
                            .map(|status| status.round_number)
                    })
                })
                .collect();
            let roller = s.spawn(|| {
                barrier.wait();
                game.advance_round()
            });

            let outcomes: Vec<_> = writers.into_iter().map(|h| h.join().unwrap()).collect();
            (outcomes, roller.join().unwrap().unwrap())
        });

        assert_eq!(board.round_number, 1);
        for (i, outcome) in outcomes.iter().enumerate() {
            let scored = board.line(&name(i)).unwrap().supported.clone();
            let pending = game.get_status(&ids[i]).unwrap().supporting;
            match outcome {
                Ok(1) => {
                    assert_eq!(scored, Some(target(i)), "accepted in round 1 but not scored");
                    assert_eq!(pending, None, "round 1 write leaked into round 2");
                }
                Ok(2) => {
                    assert_eq!(scored, None, "round 2 write scored in round 1");
                    assert_eq!(pending, Some(target(i)));
                }
                Err(DomainError::State(StateKind::RoundNotActive, _)) => {
                    assert_eq!(scored, None);
                    assert_eq!(pending, None);
                }
                other => panic!("unexpected outcome for {}: {other:?}", name(i)),
            }
        }
    }
}

#[test]
fn readers_never_observe_a_half_applied_rollover() {
    let (game, ids) = setup();
    // p0 <-> p1 mutual: both end round 1 on +3
    game.register_support(&ids[0], "p1").unwrap();
    game.register_support(&ids[1], "p0").unwrap();

    let barrier = Barrier::new(5);
    thread::scope(|s| {
        for _ in 0..4 {
            let (game, ids, barrier) = (&game, &ids, &barrier);
            s.spawn(move || {
                barrier.wait();
                for _ in 0..500 {
                    let status = game.get_status(&ids[0]).unwrap();
                    match (status.round_number, status.phase) {
                        (1, Phase::Active) | (1, Phase::Scoring) => {
                            assert_eq!(status.score, 0);
                            assert_eq!(status.supporting.as_deref(), Some("p1"));
                        }
                        (2, Phase::Active) => {
                            assert_eq!(status.score, 3);
                            assert!(status.supporting.is_none());
                            assert_eq!(status.supported_last_round.as_deref(), Some("p1"));
                        }
                        other => panic!("unexpected round state {other:?}"),
                    }
                }
            });
        }
        barrier.wait();
        game.advance_round().unwrap();
    });
}

#[test]
fn concurrent_registrations_of_one_name_admit_exactly_one() {
    let game = GameCoordinator::new(&GameConfig::default());
    let barrier = Barrier::new(8);

    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let (game, barrier) = (&game, &barrier);
                s.spawn(move || {
                    barrier.wait();
                    game.register_player("Contested")
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, DomainError::Conflict(ConflictKind::DuplicateName, _))));
    assert_eq!(game.player_count(), 1);
    assert_eq!(game.current_phase().round_number, 1);
}
