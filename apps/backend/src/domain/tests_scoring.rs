use crate::domain::scoring::{score_round, supporters_by_target, SupportSnapshot};
use crate::errors::domain::{DomainError, InfraErrorKind};

fn snapshot(entries: &[(&str, Option<&str>)]) -> SupportSnapshot {
    entries
        .iter()
        .map(|(p, t)| (p.to_string(), t.map(str::to_string)))
        .collect()
}

#[test]
fn mutual_pair_plus_one_way_supporter() {
    // Alice<->Bob mutual, Charlie->Alice only
    let support = snapshot(&[
        ("Alice", Some("Bob")),
        ("Bob", Some("Alice")),
        ("Charlie", Some("Alice")),
    ]);

    let deltas = score_round(&support).unwrap();

    assert_eq!(deltas.get("Alice"), Some(4)); // 2 received + mutual
    assert_eq!(deltas.get("Bob"), Some(3)); // 1 received + mutual
    assert_eq!(deltas.get("Charlie"), Some(-1)); // unreciprocated
}

#[test]
fn chain_with_a_silent_end() {
    // Alice->Bob, Bob->Charlie, Charlie chooses nobody
    let support = snapshot(&[
        ("Alice", Some("Bob")),
        ("Bob", Some("Charlie")),
        ("Charlie", None),
    ]);

    let deltas = score_round(&support).unwrap();

    assert_eq!(deltas.get("Alice"), Some(-1));
    assert_eq!(deltas.get("Bob"), Some(0));
    assert_eq!(deltas.get("Charlie"), Some(0));
}

#[test]
fn nobody_chooses_anybody() {
    let support = snapshot(&[("Alice", None), ("Bob", None), ("Charlie", None)]);

    let deltas = score_round(&support).unwrap();

    assert!(deltas.iter().all(|(_, d)| d == -1));
    assert_eq!(deltas.total(), -3);
}

#[test]
fn lone_player_is_penalised() {
    let deltas = score_round(&snapshot(&[("Solo", None)])).unwrap();
    assert_eq!(deltas.get("Solo"), Some(-1));
}

#[test]
fn empty_round_scores_nothing() {
    let deltas = score_round(&SupportSnapshot::new()).unwrap();
    assert!(deltas.is_empty());
}

#[test]
fn three_cycle_has_no_mutual_bonus() {
    let support = snapshot(&[
        ("A", Some("B")),
        ("B", Some("C")),
        ("C", Some("A")),
    ]);

    let deltas = score_round(&support).unwrap();

    // each receives one and is unreciprocated
    for name in ["A", "B", "C"] {
        assert_eq!(deltas.get(name), Some(0), "{name}");
    }
}

#[test]
fn popular_player_without_choice() {
    let support = snapshot(&[
        ("Star", None),
        ("F1", Some("Star")),
        ("F2", Some("Star")),
        ("F3", Some("Star")),
    ]);

    let deltas = score_round(&support).unwrap();

    assert_eq!(deltas.get("Star"), Some(2)); // 3 received - no support
    assert_eq!(deltas.get("F1"), Some(-1));
}

#[test]
fn unknown_target_is_data_corruption() {
    let support = snapshot(&[("Alice", Some("Ghost")), ("Bob", None)]);

    match score_round(&support) {
        Err(DomainError::Infra(InfraErrorKind::DataCorruption, detail)) => {
            assert!(detail.contains("Ghost"));
        }
        other => panic!("expected DataCorruption, got {other:?}"),
    }
}

#[test]
fn self_target_is_data_corruption() {
    let support = snapshot(&[("Alice", Some("Alice"))]);
    assert!(matches!(
        score_round(&support),
        Err(DomainError::Infra(InfraErrorKind::DataCorruption, _))
    ));
}

#[test]
fn supporters_index_matches_graph() {
    let support = snapshot(&[
        ("Alice", Some("Bob")),
        ("Bob", Some("Alice")),
        ("Charlie", Some("Alice")),
    ]);

    let by_target = supporters_by_target(&support);

    assert_eq!(by_target.get("Alice"), Some(&vec!["Bob", "Charlie"]));
    assert_eq!(by_target.get("Bob"), Some(&vec!["Alice"]));
    assert!(!by_target.contains_key("Charlie"));
}
