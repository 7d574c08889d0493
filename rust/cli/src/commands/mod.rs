//! Command handler modules for the diemso CLI.
//!
//! Each command lives in its own module with the same shape:
//!
//! - Public handler function: `pub fn handle_COMMAND_command(...) -> Result<(), CliError>`
//! - Output streams (`&mut dyn Write`) and the session store passed in as parameters
//! - Errors propagated via `CliError`
//!
//! Handlers load the session for their game, apply one transition, save the
//! result and print what changed.

mod cfg;
mod dealer;
mod export;
mod new;
mod players;
mod rank;
mod reset;
mod round;
mod rules;
mod show;
mod undo;
mod verify;

pub use cfg::handle_cfg_command;
pub use dealer::handle_dealer_command;
pub use export::handle_export_command;
pub use new::handle_new_command;
pub use players::{handle_add_player_command, handle_remove_player_command};
pub use rank::{handle_pig_command, handle_rank_command};
pub use reset::handle_reset_command;
pub use round::{handle_round_command, RoundRequest};
pub use rules::{handle_rules_command, RuleOverrides};
pub use show::{handle_show_command, handle_summary_command};
pub use undo::handle_undo_command;
pub use verify::handle_verify_command;

use std::io::Write;

use diemso_engine::notify::Notifier;
use diemso_engine::player::{resolve_player, PlayerId};
use diemso_engine::session::{Game, Settled, SessionState};
use diemso_engine::storage::SessionStore;

use crate::error::CliError;
use crate::formatters::{format_delta, format_scoreboard};
use crate::ui::{self, TerminalNotifier};

/// Loads the saved session for `game`, or explains how to start one.
pub(crate) fn load_session(
    store: &dyn SessionStore,
    game: Game,
    err: &mut dyn Write,
) -> Result<SessionState, CliError> {
    let missing = || {
        CliError::InvalidInput(format!(
            "No {} session found; start one with `diemso {} new --player NAME --player NAME`",
            game,
            game.storage_key()
        ))
    };
    match store.try_load(game.storage_key()) {
        Ok(Some(state)) if state.game() == game => Ok(state),
        Ok(Some(_)) => Err(CliError::InvalidInput(format!(
            "Saved {} session holds a different game",
            game.storage_key()
        ))),
        Ok(None) => Err(missing()),
        Err(e) => {
            tracing::warn!(key = game.storage_key(), error = %e, "unreadable session");
            ui::display_warning(err, &format!("Saved session could not be read: {}", e))?;
            Err(missing())
        }
    }
}

pub(crate) fn save_session(
    store: &mut dyn SessionStore,
    state: &SessionState,
) -> Result<(), CliError> {
    store.try_save(state.game().storage_key(), state)?;
    Ok(())
}

pub(crate) fn resolve(state: &SessionState, key: &str) -> Result<PlayerId, CliError> {
    Ok(resolve_player(state.players(), key)?)
}

/// Saves a settled round, announces it and prints each delta followed by
/// the updated scoreboard.
pub(crate) fn finish_round(
    store: &mut dyn SessionStore,
    settled: &Settled,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    save_session(store, &settled.state)?;
    let outcome = &settled.outcome;
    TerminalNotifier::new(out).notify(&outcome.record, outcome.big_win, &outcome.description);
    for player in settled.state.players() {
        if outcome.record.score_changes.contains(player.id()) {
            writeln!(
                out,
                "  {}: {}",
                player.name(),
                format_delta(outcome.record.score_changes.get(player.id()))
            )?;
        }
    }
    writeln!(out)?;
    for line in format_scoreboard(&settled.state) {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}
