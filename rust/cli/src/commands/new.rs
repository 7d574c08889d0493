//! `new`: start a session for one game.

use std::io::Write;

use diemso_engine::player::{resolve_player, seat_players};
use diemso_engine::session::{Game, SessionState};
use diemso_engine::storage::SessionStore;

use crate::commands::save_session;
use crate::config::Config;
use crate::error::CliError;
use crate::formatters::format_scoreboard;
use crate::ui;

/// Seats `names` in order and saves a fresh session for `game`.
///
/// An existing session with recorded rounds is only replaced with `force`.
/// For Tiến Lên the configured rank points are used; for Xì Dách `dealer`
/// picks the initial dealer (first player otherwise).
pub fn handle_new_command(
    game: Game,
    names: &[String],
    dealer: Option<&str>,
    force: bool,
    config: &Config,
    store: &mut dyn SessionStore,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if !force
        && let Ok(Some(existing)) = store.try_load(game.storage_key())
        && !existing.history().is_empty()
    {
        return Err(CliError::InvalidInput(format!(
            "A {} session with {} recorded round(s) already exists; pass --force to replace it",
            game,
            existing.history().len()
        )));
    }

    let players = seat_players(names)?;
    let state = match game {
        Game::TienLen => {
            if dealer.is_some() {
                ui::warn_parameter_unused(err, "dealer")?;
            }
            SessionState::new_tien_len(players, config.rank_points)?
        }
        Game::XiDach => {
            let dealer = dealer
                .map(|key| resolve_player(&players, key))
                .transpose()?;
            SessionState::new_xi_dach(players, dealer)?
        }
    };
    save_session(store, &state)?;

    writeln!(
        out,
        "New {} session with {} players.",
        game,
        state.players().len()
    )?;
    for line in format_scoreboard(&state) {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}
