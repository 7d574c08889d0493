//! Read-only views of a session.

use std::io::Write;

use diemso_engine::session::Game;
use diemso_engine::storage::SessionStore;

use crate::commands::load_session;
use crate::error::CliError;
use crate::formatters::{format_rank_points, format_round, format_scoreboard, format_summary};

/// Scoreboard, game settings and the `last` most recent rounds.
pub fn handle_show_command(
    game: Game,
    last: usize,
    store: &dyn SessionStore,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let state = load_session(store, game, err)?;
    writeln!(out, "{}", game)?;
    for line in format_scoreboard(&state) {
        writeln!(out, "{}", line)?;
    }
    if let Some(points) = state.rank_points() {
        writeln!(out)?;
        writeln!(out, "Rank points:")?;
        for line in format_rank_points(points) {
            writeln!(out, "  {}", line)?;
        }
    }

    writeln!(out)?;
    if state.history().is_empty() {
        writeln!(out, "No rounds recorded.")?;
        return Ok(());
    }
    writeln!(
        out,
        "History ({} round(s), latest first):",
        state.history().len()
    )?;
    for record in state.history().iter().take(last) {
        writeln!(out, "  {}", format_round(record, state.players()))?;
    }
    if state.history().len() > last {
        writeln!(out, "  ... {} older", state.history().len() - last)?;
    }
    Ok(())
}

pub fn handle_summary_command(
    game: Game,
    store: &dyn SessionStore,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let state = load_session(store, game, err)?;
    for line in format_summary(&state.summary()) {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}
