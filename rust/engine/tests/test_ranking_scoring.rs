use diemso_engine::errors::EngineError;
use diemso_engine::player::{Player, PlayerId};
use diemso_engine::rank::{settle_penalty, settle_ranking, PenaltyKind, RankPoints};
use diemso_engine::session::SessionState;

fn ids(names: &[&str]) -> Vec<PlayerId> {
    names.iter().map(|s| PlayerId::from(*s)).collect()
}

fn table(n: usize) -> SessionState {
    let players = ["A", "B", "C", "D", "E"]
        .iter()
        .take(n)
        .map(|s| Player::new(*s, format!("Player {}", s)))
        .collect();
    SessionState::new_tien_len(players, RankPoints::default()).expect("session")
}

#[test]
fn four_finishers_use_all_point_values() {
    let c = settle_ranking(&ids(&["A", "B", "C", "D"]), &RankPoints::default());
    assert_eq!(c.get(&"A".into()), 5);
    assert_eq!(c.get(&"B".into()), 3);
    assert_eq!(c.get(&"C".into()), -3);
    assert_eq!(c.get(&"D".into()), -5);
    assert!(c.is_zero_sum());
}

#[test]
fn three_finishers_give_middle_zero() {
    let c = settle_ranking(&ids(&["A", "B", "C"]), &RankPoints::default());
    assert_eq!(c.len(), 3);
    assert_eq!(c.get(&"A".into()), 5);
    assert_eq!(c.get(&"B".into()), 0);
    assert_eq!(c.get(&"C".into()), -5);
}

#[test]
fn two_finishers_only_first_and_last() {
    let c = settle_ranking(&ids(&["A", "B"]), &RankPoints::default());
    assert_eq!(c.len(), 2);
    assert_eq!(c.get(&"A".into()), 5);
    assert_eq!(c.get(&"B".into()), -5);
}

#[test]
fn black_pig_penalty_moves_three_points() {
    let c = settle_penalty(&"A".into(), &"B".into(), PenaltyKind::Black, &RankPoints::default());
    assert_eq!(c.get(&"A".into()), 3);
    assert_eq!(c.get(&"B".into()), -3);
    assert!(c.is_zero_sum());
}

#[test]
fn partial_ranking_leaves_unlisted_players_untouched() {
    let settled = table(5)
        .submit_ranking(&ids(&["E", "D", "C", "B"]))
        .expect("ranking");
    let scores: Vec<i64> = settled.state.players().iter().map(|p| p.score()).collect();
    assert_eq!(scores, vec![0, -5, -3, 3, 5]);
    assert!(!settled.outcome.record.score_changes.contains(&"A".into()));
}

#[test]
fn ranking_round_celebrates_and_penalty_clinks() {
    let s = table(4);
    let ranked = s.submit_ranking(&ids(&["A", "B"])).expect("ranking");
    assert!(ranked.outcome.big_win);
    assert_eq!(ranked.outcome.description, "Ranking");

    let pig = ranked
        .state
        .submit_penalty(&"C".into(), &"D".into(), PenaltyKind::Red)
        .expect("penalty");
    assert!(!pig.outcome.big_win);
    assert_eq!(pig.outcome.description, "Penalty: red pig");
    assert_eq!(pig.state.history().len(), 2);
}

#[test]
fn degenerate_rankings_are_rejected() {
    let s = table(3);
    assert_eq!(
        s.submit_ranking(&ids(&["A"])).unwrap_err(),
        EngineError::RankingTooShort { actual: 1 }
    );
    assert_eq!(
        s.submit_ranking(&ids(&["A", "A"])).unwrap_err(),
        EngineError::DuplicateFinisher("A".into())
    );
    assert_eq!(
        s.submit_penalty(&"B".into(), &"B".into(), PenaltyKind::Black)
            .unwrap_err(),
        EngineError::SelfPenalty
    );
    // nothing was recorded
    assert!(s.history().is_empty());
}

#[test]
fn updated_rules_apply_to_later_rounds_only() {
    let first = table(4).submit_ranking(&ids(&["A", "B"])).expect("ranking");
    let doubled = RankPoints {
        first: 10,
        second: 6,
        third: -6,
        last: -10,
        pig_black: 6,
        pig_red: 10,
    };
    let second = first
        .state
        .update_rules(doubled)
        .expect("rules")
        .submit_ranking(&ids(&["A", "B"]))
        .expect("ranking");
    assert_eq!(second.state.players()[0].score(), 15);
    let oldest = second.state.history().iter().last().expect("first round");
    assert_eq!(oldest.score_changes.get(&"A".into()), 5);
}

#[test]
fn inverted_rules_are_rejected() {
    let bad = RankPoints {
        second: 9,
        ..RankPoints::default()
    };
    assert!(matches!(
        table(2).update_rules(bad),
        Err(EngineError::InvalidRankPoints(_))
    ));
}
