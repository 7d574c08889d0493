//! Tiến Lên rounds: finishing order and pig penalties.

use std::io::Write;

use diemso_engine::player::PlayerId;
use diemso_engine::rank::PenaltyKind;
use diemso_engine::session::Game;
use diemso_engine::storage::SessionStore;

use crate::cli::PigKind;
use crate::commands::{finish_round, load_session, resolve};
use crate::error::CliError;

/// Records a finishing order given best first, by name or id.
pub fn handle_rank_command(
    names: &[String],
    store: &mut dyn SessionStore,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let state = load_session(store, Game::TienLen, err)?;
    let order = names
        .iter()
        .map(|n| resolve(&state, n))
        .collect::<Result<Vec<PlayerId>, _>>()?;
    let settled = state.submit_ranking(&order)?;
    finish_round(store, &settled, out)
}

pub fn handle_pig_command(
    winner: &str,
    loser: &str,
    kind: PigKind,
    store: &mut dyn SessionStore,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let state = load_session(store, Game::TienLen, err)?;
    let winner = resolve(&state, winner)?;
    let loser = resolve(&state, loser)?;
    let kind = match kind {
        PigKind::Black => PenaltyKind::Black,
        PigKind::Red => PenaltyKind::Red,
    };
    let settled = state.submit_penalty(&winner, &loser, kind)?;
    finish_round(store, &settled, out)
}
