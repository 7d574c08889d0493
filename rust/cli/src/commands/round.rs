//! `xidach round`: open, fill in and settle one betting round.

use std::io::Write;

use diemso_engine::bet::{RoundDraft, Tier};
use diemso_engine::errors::EngineError;
use diemso_engine::player::PlayerId;
use diemso_engine::session::{Game, SessionState};
use diemso_engine::storage::SessionStore;

use crate::commands::{finish_round, load_session, resolve};
use crate::error::CliError;
use crate::validation::{parse_seat_spec, SeatSpec};

/// Everything given on the `round` command line.
#[derive(Debug, Clone, Default)]
pub struct RoundRequest {
    pub dealer_tier: u8,
    pub sets: Vec<String>,
    pub dealer_takes_all: bool,
    pub draw_all: bool,
    pub copy_bet: bool,
}

/// Every active player starts from their remembered bet (or the starting
/// bet) with a LOSE result. Edits are applied in order: dealer tier, quick
/// result actions, `--set` entries, then `--copy-bet`.
pub fn handle_round_command(
    request: &RoundRequest,
    starting_bet: i64,
    store: &mut dyn SessionStore,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let state = load_session(store, Game::XiDach, err)?;
    let dealer_tier = Tier::try_from(request.dealer_tier).map_err(CliError::InvalidInput)?;

    let specs = request
        .sets
        .iter()
        .map(|s| parse_seat_spec(s).map_err(CliError::InvalidInput))
        .collect::<Result<Vec<_>, _>>()?;
    let seats = specs
        .into_iter()
        .map(|spec| resolve(&state, &spec.player).map(|id| (id, spec)))
        .collect::<Result<Vec<_>, _>>()?;
    if let Some(dealer) = state.dealer_id()
        && let Some((_, spec)) = seats.iter().find(|(id, _)| id == dealer)
    {
        return Err(CliError::InvalidInput(format!(
            "{} is the dealer and has no bet this round",
            spec.player
        )));
    }

    let collecting = state.open_round(starting_bet)?.edit_round(|draft| {
        draft.set_dealer_tier(dealer_tier);
        if request.dealer_takes_all {
            draft.dealer_takes_all();
        }
        if request.draw_all {
            draft.draw_all();
        }
        for (id, spec) in &seats {
            apply_spec(draft, id, spec)?;
        }
        if request.copy_bet {
            draft.copy_first_bet();
        }
        Ok(())
    })?;
    print_draft(&collecting, out)?;
    let settled = collecting.settle_round()?;
    finish_round(store, &settled, out)
}

fn apply_spec(
    draft: &mut RoundDraft,
    id: &PlayerId,
    spec: &SeatSpec,
) -> Result<(), EngineError> {
    if let Some(bet) = spec.bet {
        draft.set_bet(id, bet)?;
    }
    if let Some(tier) = spec.tier {
        draft.set_tier(id, tier)?;
    }
    if let Some(outcome) = spec.outcome {
        draft.set_outcome(id, outcome)?;
    }
    Ok(())
}

fn print_draft(state: &SessionState, out: &mut dyn Write) -> Result<(), CliError> {
    let Some(draft) = state.draft() else {
        return Ok(());
    };
    let name = |id: &PlayerId| {
        state
            .players()
            .iter()
            .find(|p| p.id() == id)
            .map(|p| p.name().to_string())
            .unwrap_or_else(|| id.to_string())
    };
    if let Some(dealer) = state.dealer_id() {
        writeln!(out, "Dealer {} ({})", name(dealer), draft.dealer_tier())?;
    }
    for (id, entry) in draft.seats() {
        writeln!(
            out,
            "  {} bets {} -> {} ({})",
            name(id),
            entry.bet_amount,
            entry.result_outcome,
            entry.multiplier_tier
        )?;
    }
    Ok(())
}
