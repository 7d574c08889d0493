//! Roster edits, allowed only before the first round is recorded.

use std::io::Write;

use diemso_engine::session::Game;
use diemso_engine::storage::SessionStore;

use crate::commands::{load_session, resolve, save_session};
use crate::error::CliError;

pub fn handle_add_player_command(
    game: Game,
    name: &str,
    store: &mut dyn SessionStore,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let state = load_session(store, game, err)?;
    let next = state.add_player(name)?;
    save_session(store, &next)?;
    if let Some(added) = next.players().last() {
        writeln!(out, "Added {} ({}).", added.name(), added.id())?;
        if next.dealer_id() != state.dealer_id() && next.dealer_id() == Some(added.id()) {
            writeln!(out, "Dealer is now {}.", added.name())?;
        }
    }
    Ok(())
}

pub fn handle_remove_player_command(
    game: Game,
    player: &str,
    store: &mut dyn SessionStore,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let state = load_session(store, game, err)?;
    let id = resolve(&state, player)?;
    let name = state
        .players()
        .iter()
        .find(|p| p.id() == &id)
        .map(|p| p.name().to_string())
        .unwrap_or_else(|| id.to_string());
    let next = state.remove_player(&id)?;
    save_session(store, &next)?;
    writeln!(out, "Removed {}.", name)?;
    if state.dealer_id() == Some(&id) {
        match next
            .dealer_id()
            .and_then(|d| next.players().iter().find(|p| p.id() == d))
        {
            Some(p) => writeln!(out, "Dealer is now {}.", p.name())?,
            None => writeln!(out, "No dealer left.")?,
        }
    }
    Ok(())
}
