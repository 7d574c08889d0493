use std::io::Write;

use diemso_engine::session::Game;
use diemso_engine::storage::SessionStore;

use crate::commands::{load_session, resolve, save_session};
use crate::error::CliError;

/// Hands the dealer role to `player`. Scores and history are untouched.
pub fn handle_dealer_command(
    player: &str,
    store: &mut dyn SessionStore,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let state = load_session(store, Game::XiDach, err)?;
    let id = resolve(&state, player)?;
    let next = state.change_dealer(&id)?;
    save_session(store, &next)?;
    let name = next
        .players()
        .iter()
        .find(|p| p.id() == &id)
        .map(|p| p.name())
        .unwrap_or(player);
    writeln!(out, "Dealer is now {}.", name)?;
    Ok(())
}
