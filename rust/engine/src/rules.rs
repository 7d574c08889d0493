//! Input checks applied before a round reaches the settlement functions.
//!
//! Settlement itself is total; these functions are where degenerate input
//! (short rankings, self-penalties, a missing dealer) gets turned away.

use std::collections::HashSet;

use crate::bet::{RoundDraft, MAX_BET};
use crate::errors::EngineError;
use crate::player::{contains_player, Player, PlayerId};

/// Validates a finishing order against the seated roster.
///
/// # Errors
///
/// - [`EngineError::RankingTooShort`] - fewer than two finishers
/// - [`EngineError::RankingTooLong`] - more finishers than seated players
/// - [`EngineError::DuplicateFinisher`] - a player listed twice
/// - [`EngineError::UnknownPlayer`] - an id not on the roster
///
/// # Examples
///
/// ```
/// use diemso_engine::errors::EngineError;
/// use diemso_engine::player::{Player, PlayerId};
/// use diemso_engine::rules::validate_ranking;
///
/// let players = vec![Player::new("a", "An"), Player::new("b", "Binh")];
/// assert!(validate_ranking(&players, &[PlayerId::from("a"), PlayerId::from("b")]).is_ok());
/// assert_eq!(
///     validate_ranking(&players, &[PlayerId::from("a")]),
///     Err(EngineError::RankingTooShort { actual: 1 })
/// );
/// ```
pub fn validate_ranking(players: &[Player], finishers: &[PlayerId]) -> Result<(), EngineError> {
    if finishers.len() < 2 {
        return Err(EngineError::RankingTooShort {
            actual: finishers.len(),
        });
    }
    if finishers.len() > players.len() {
        return Err(EngineError::RankingTooLong {
            actual: finishers.len(),
            players: players.len(),
        });
    }
    let mut seen = HashSet::new();
    for id in finishers {
        if !contains_player(players, id) {
            return Err(EngineError::UnknownPlayer(id.to_string()));
        }
        if !seen.insert(id) {
            return Err(EngineError::DuplicateFinisher(id.clone()));
        }
    }
    Ok(())
}

pub fn validate_penalty(
    players: &[Player],
    winner: &PlayerId,
    loser: &PlayerId,
) -> Result<(), EngineError> {
    for id in [winner, loser] {
        if !contains_player(players, id) {
            return Err(EngineError::UnknownPlayer(id.to_string()));
        }
    }
    if winner == loser {
        return Err(EngineError::SelfPenalty);
    }
    Ok(())
}

/// Confirms a dealer is selected and seated, returning it.
pub fn validate_dealer<'a>(
    players: &[Player],
    dealer: Option<&'a PlayerId>,
) -> Result<&'a PlayerId, EngineError> {
    let dealer = dealer.ok_or(EngineError::NoDealer)?;
    if !contains_player(players, dealer) {
        return Err(EngineError::UnknownPlayer(dealer.to_string()));
    }
    Ok(dealer)
}

/// Checks one bet amount against `0..=MAX_BET`.
pub fn validate_bet(player: &PlayerId, amount: i64) -> Result<(), EngineError> {
    if amount < 0 {
        return Err(EngineError::NegativeBet {
            player: player.clone(),
            amount,
        });
    }
    if amount > MAX_BET {
        return Err(EngineError::BetTooLarge {
            player: player.clone(),
            amount,
            max: MAX_BET,
        });
    }
    Ok(())
}

/// Checks a collected round before it is settled.
pub fn validate_draft(
    players: &[Player],
    dealer: &PlayerId,
    draft: &RoundDraft,
) -> Result<(), EngineError> {
    let mut seated = 0usize;
    for (id, entry) in draft.seats() {
        if id == dealer {
            continue;
        }
        if !contains_player(players, id) {
            return Err(EngineError::UnknownPlayer(id.to_string()));
        }
        validate_bet(id, entry.bet_amount)?;
        seated += 1;
    }
    if seated == 0 {
        return Err(EngineError::NoActivePlayers);
    }
    Ok(())
}
