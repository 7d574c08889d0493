mod helpers;

use helpers::{Sandbox, score_of};
use serial_test::serial;

fn start(sb: &Sandbox) {
    sb.ok(&[
        "tienlen", "new", "--player", "An", "--player", "Binh", "--player", "Chi", "--player",
        "Dung",
    ]);
}

#[test]
#[serial]
fn new_session_is_saved_with_default_points() {
    let sb = Sandbox::new();
    let out = sb.ok(&["tienlen", "new", "--player", "An", "--player", "Binh"]);
    assert!(out.contains("New Tiến Lên session with 2 players."));

    let saved = sb.saved("tienlen");
    assert_eq!(saved["gameConfig"]["game"], "tien_len");
    assert_eq!(saved["gameConfig"]["rankPoints"]["LAST"], -5);
    assert_eq!(saved["history"].as_array().map(Vec::len), Some(0));
}

#[test]
#[serial]
fn four_player_ranking_scores_every_place() {
    let sb = Sandbox::new();
    start(&sb);

    let out = sb.ok(&["tienlen", "rank", "Chi", "An", "dung", "Binh"]);
    assert!(out.contains("*** BIG WIN *** Ranking"));
    assert!(out.contains("  Chi: +5"));
    assert!(out.contains("  Binh: -5"));

    let saved = sb.saved("tienlen");
    assert_eq!(score_of(&saved, "Chi"), 5);
    assert_eq!(score_of(&saved, "An"), 3);
    assert_eq!(score_of(&saved, "Dung"), -3);
    assert_eq!(score_of(&saved, "Binh"), -5);
}

#[test]
#[serial]
fn pig_penalty_moves_points_between_two_players() {
    let sb = Sandbox::new();
    start(&sb);

    let out = sb.ok(&["tienlen", "pig", "--winner", "An", "--loser", "Binh", "--kind", "red"]);
    assert!(out.contains("Recorded: Penalty: red pig"));

    let saved = sb.saved("tienlen");
    assert_eq!(score_of(&saved, "An"), 5);
    assert_eq!(score_of(&saved, "Binh"), -5);
    assert_eq!(score_of(&saved, "Chi"), 0);
}

#[test]
#[serial]
fn self_penalty_and_unknown_players_are_rejected() {
    let sb = Sandbox::new();
    start(&sb);

    let res = sb.run(&["tienlen", "pig", "--winner", "An", "--loser", "an", "--kind", "black"]);
    assert_eq!(res.code, 2);
    assert!(res.stderr.contains("Error:"));

    let res = sb.run(&["tienlen", "rank", "An", "Zed"]);
    assert_eq!(res.code, 2);
    assert!(res.stderr.contains("Zed"));

    let res = sb.run(&["tienlen", "rank", "An", "Binh", "An"]);
    assert_eq!(res.code, 2);
    assert_eq!(sb.saved("tienlen")["history"].as_array().map(Vec::len), Some(0));
}

#[test]
#[serial]
fn undo_reverts_only_the_latest_round() {
    let sb = Sandbox::new();
    start(&sb);
    sb.ok(&["tienlen", "rank", "An", "Binh", "Chi", "Dung"]);
    sb.ok(&["tienlen", "pig", "--winner", "Dung", "--loser", "An", "--kind", "black"]);

    let out = sb.ok(&["tienlen", "undo"]);
    assert!(out.contains("Undone: Penalty: black pig"));

    let saved = sb.saved("tienlen");
    assert_eq!(saved["history"].as_array().map(Vec::len), Some(1));
    assert_eq!(score_of(&saved, "An"), 5);
    assert_eq!(score_of(&saved, "Dung"), -5);

    sb.ok(&["tienlen", "undo"]);
    let out = sb.ok(&["tienlen", "undo"]);
    assert!(out.contains("Nothing to undo."));
    assert_eq!(score_of(&sb.saved("tienlen"), "An"), 0);
}

#[test]
#[serial]
fn round_ids_keep_counting_after_undo() {
    let sb = Sandbox::new();
    start(&sb);
    sb.ok(&["tienlen", "rank", "An", "Binh"]);
    sb.ok(&["tienlen", "undo"]);
    sb.ok(&["tienlen", "rank", "An", "Binh"]);

    let saved = sb.saved("tienlen");
    let id = saved["history"][0]["id"].as_str().unwrap();
    assert!(id.ends_with("-000002"), "unexpected id {}", id);
}

#[test]
#[serial]
fn rules_change_applies_to_later_rounds_only() {
    let sb = Sandbox::new();
    start(&sb);
    sb.ok(&["tienlen", "rank", "An", "Binh", "Chi", "Dung"]);

    let out = sb.ok(&["tienlen", "rules", "--first", "10", "--last", "-10"]);
    assert!(out.contains("earlier rounds keep their scores"));
    sb.ok(&["tienlen", "rank", "An", "Binh", "Chi", "Dung"]);

    let saved = sb.saved("tienlen");
    assert_eq!(saved["gameConfig"]["rankPoints"]["FIRST"], 10);
    assert_eq!(score_of(&saved, "An"), 15);
    assert_eq!(score_of(&saved, "Dung"), -15);

    let res = sb.run(&["tienlen", "rules", "--first", "-1"]);
    assert_eq!(res.code, 2);
}

#[test]
#[serial]
fn roster_locks_once_a_round_is_recorded() {
    let sb = Sandbox::new();
    sb.ok(&["tienlen", "new", "--player", "An", "--player", "Binh"]);

    let out = sb.ok(&["tienlen", "add-player", "Chi"]);
    assert!(out.contains("Added Chi"));
    sb.ok(&["tienlen", "remove-player", "chi"]);

    sb.ok(&["tienlen", "rank", "An", "Binh"]);
    let res = sb.run(&["tienlen", "add-player", "Chi"]);
    assert_eq!(res.code, 2);
    assert_eq!(sb.saved("tienlen")["players"].as_array().map(Vec::len), Some(2));
}

#[test]
#[serial]
fn show_and_summary_describe_the_session() {
    let sb = Sandbox::new();
    start(&sb);
    sb.ok(&["tienlen", "rank", "Binh", "An", "Chi", "Dung"]);

    let out = sb.ok(&["tienlen", "show"]);
    assert!(out.contains("History (1 round(s), latest first):"));
    assert!(out.contains("FIRST"));
    let first_line = out.lines().find(|l| l.contains("1. ")).unwrap();
    assert!(first_line.contains("Binh"));

    let out = sb.ok(&["tienlen", "summary"]);
    assert!(out.contains("Winners: Binh +5, An +3"));
    assert!(out.contains("Losers: Dung -5, Chi -3"));
}

#[test]
#[serial]
fn starting_over_requires_force_once_rounds_exist() {
    let sb = Sandbox::new();
    start(&sb);
    sb.ok(&["tienlen", "rank", "An", "Binh"]);

    let res = sb.run(&["tienlen", "new", "--player", "X", "--player", "Y"]);
    assert_eq!(res.code, 2);
    assert!(res.stderr.contains("--force"));

    sb.ok(&["tienlen", "new", "--player", "X", "--player", "Y", "--force"]);
    assert_eq!(score_of(&sb.saved("tienlen"), "X"), 0);
}
