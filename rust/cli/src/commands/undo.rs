use std::io::Write;

use diemso_engine::notify::Notifier;
use diemso_engine::session::Game;
use diemso_engine::storage::SessionStore;

use crate::commands::{load_session, save_session};
use crate::error::CliError;
use crate::formatters::format_scoreboard;
use crate::ui::TerminalNotifier;

/// Reverses the most recent round. An empty history is not an error.
pub fn handle_undo_command(
    game: Game,
    store: &mut dyn SessionStore,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let state = load_session(store, game, err)?;
    let (next, undone) = state.undo();
    let Some(record) = undone else {
        writeln!(out, "Nothing to undo.")?;
        return Ok(());
    };
    save_session(store, &next)?;
    TerminalNotifier::new(out).undone(&record);
    for line in format_scoreboard(&next) {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}
