//! Scoreboard and history formatters for terminal display.
//!
//! Pure functions from engine values to display lines; handlers decide where
//! the lines go.
//!
//! ## Example
//!
//! ```rust
//! use diemso_cli::formatters::format_delta;
//!
//! assert_eq!(format_delta(5), "+5");
//! assert_eq!(format_delta(-3), "-3");
//! assert_eq!(format_delta(0), "0");
//! ```

use diemso_engine::ledger::RoundRecord;
use diemso_engine::player::Player;
use diemso_engine::rank::RankPoints;
use diemso_engine::session::{SessionState, Summary};

/// Signed score delta; positive values carry an explicit `+`.
pub fn format_delta(delta: i64) -> String {
    if delta > 0 {
        format!("+{}", delta)
    } else {
        delta.to_string()
    }
}

fn player_name<'a>(players: &'a [Player], id: &'a str) -> &'a str {
    players
        .iter()
        .find(|p| p.id().as_str() == id)
        .map(Player::name)
        .unwrap_or(id)
}

/// Ranked scoreboard lines, highest score first. The dealer, when there is
/// one, is marked.
pub fn format_scoreboard(state: &SessionState) -> Vec<String> {
    let width = state
        .players()
        .iter()
        .map(|p| p.name().chars().count())
        .max()
        .unwrap_or(0);
    state
        .standings()
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let marker = if state.dealer_id() == Some(p.id()) {
                "  (dealer)"
            } else {
                ""
            };
            let pad = width - p.name().chars().count();
            format!(
                "{:>2}. {}{}  {:>6}{}",
                i + 1,
                p.name(),
                " ".repeat(pad),
                format_delta(p.score()),
                marker
            )
        })
        .collect()
}

/// One history line: id, UTC time, description and every delta.
pub fn format_round(record: &RoundRecord, players: &[Player]) -> String {
    let when = record
        .recorded_at()
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_default();
    let deltas: Vec<String> = record
        .score_changes
        .iter()
        .map(|(id, d)| format!("{} {}", player_name(players, id.as_str()), format_delta(d)))
        .collect();
    format!(
        "{}  {}  {}: {}",
        record.id,
        when,
        record.description,
        deltas.join(", ")
    )
}

pub fn format_rank_points(points: &RankPoints) -> Vec<String> {
    let mut lines = vec![
        format!("FIRST      {}", format_delta(points.first)),
        format!("SECOND     {}", format_delta(points.second)),
        format!("THIRD      {}", format_delta(points.third)),
        format!("LAST       {}", format_delta(points.last)),
        format!("PIG_BLACK  {}", points.pig_black),
        format!("PIG_RED    {}", points.pig_red),
    ];
    if !points.is_symmetric() {
        lines.push("note: points are not symmetric, ranking rounds will not balance".to_string());
    }
    lines
}

pub fn format_summary(summary: &Summary<'_>) -> Vec<String> {
    if summary.winners.is_empty() && summary.losers.is_empty() {
        return vec!["All square.".to_string()];
    }
    let join = |players: &[&Player]| {
        players
            .iter()
            .map(|p| format!("{} {}", p.name(), format_delta(p.score())))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let mut lines = Vec::new();
    if !summary.winners.is_empty() {
        lines.push(format!("Winners: {}", join(&summary.winners)));
    }
    if !summary.losers.is_empty() {
        lines.push(format!("Losers: {}", join(&summary.losers)));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SessionState {
        SessionState::new_xi_dach(
            vec![Player::new("d", "Dealer"), Player::new("p", "Phuong")],
            None,
        )
        .unwrap()
    }

    #[test]
    fn scoreboard_marks_dealer() {
        let lines = format_scoreboard(&session());
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Dealer") && lines[0].ends_with("(dealer)"));
        assert!(!lines[1].contains("(dealer)"));
    }

    #[test]
    fn round_line_uses_names() {
        let settled = session()
            .submit_round(&Default::default(), diemso_engine::bet::Tier::XiDach)
            .unwrap();
        let line = format_round(&settled.outcome.record, settled.state.players());
        assert!(line.contains("Dealer special hand"));
        assert!(line.contains("Phuong 0"));
        assert!(line.starts_with(&settled.outcome.record.id));
    }

    #[test]
    fn asymmetric_points_get_a_note() {
        let points = RankPoints {
            first: 9,
            ..RankPoints::default()
        };
        assert!(format_rank_points(&points).last().unwrap().starts_with("note:"));
        assert_eq!(format_rank_points(&RankPoints::default()).len(), 6);
    }

    #[test]
    fn empty_summary_is_all_square() {
        let s = session();
        assert_eq!(format_summary(&s.summary()), vec!["All square."]);
    }
}
