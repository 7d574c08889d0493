//! `verify`: audit a saved session.
//!
//! Replays the history from each player's opening score and compares the
//! result with the stored running scores, and checks that every round
//! balances.

use std::io::Write;

use diemso_engine::ledger::LedgerIssue;
use diemso_engine::session::Game;
use diemso_engine::storage::SessionStore;

use crate::commands::load_session;
use crate::error::CliError;
use crate::formatters::format_delta;
use crate::ui;

pub fn handle_verify_command(
    game: Game,
    store: &dyn SessionStore,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let state = load_session(store, game, err)?;
    let issues = state.audit();
    if issues.is_empty() {
        writeln!(
            out,
            "OK: {} round(s), every round balances and all scores match the history.",
            state.history().len()
        )?;
        return Ok(());
    }

    for issue in &issues {
        let msg = match issue {
            LedgerIssue::NonZeroSum { round_id, total } => {
                format!("round {} does not balance (total {})", round_id, format_delta(*total))
            }
            LedgerIssue::ScoreMismatch {
                player,
                expected,
                actual,
            } => {
                let name = state
                    .players()
                    .iter()
                    .find(|p| p.id() == player)
                    .map(|p| p.name())
                    .unwrap_or(player.as_str());
                format!(
                    "{} has score {} but the history adds up to {}",
                    name, actual, expected
                )
            }
        };
        ui::display_warning(err, &msg)?;
    }
    Err(CliError::InvalidInput(format!(
        "ledger audit found {} issue(s)",
        issues.len()
    )))
}
