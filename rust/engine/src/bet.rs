//! Xì Dách scoring: one dealer settling against every other active player.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::EngineError;
use crate::ledger::ScoreChanges;
use crate::player::PlayerId;
use crate::rules::validate_bet;

/// Bet seeded for a player with no remembered default.
pub const DEFAULT_STARTING_BET: i64 = 10;

/// Largest bet a player may place. With the x3 tier a single player's delta
/// stays within ±3e9, far inside `i64`.
pub const MAX_BET: i64 = 1_000_000_000;

/// Dealer net gain above which an ordinary round still counts as a big win.
pub const BIG_WIN_THRESHOLD: i64 = 100;

pub const DEALER_SPECIAL_DESCRIPTION: &str = "Dealer special hand";
pub const ROUND_RESULT_DESCRIPTION: &str = "Round result";

/// A non-dealer player's result against an ordinary dealer hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Win,
    #[default]
    Lose,
    Draw,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win => f.write_str("win"),
            Outcome::Lose => f.write_str("lose"),
            Outcome::Draw => f.write_str("draw"),
        }
    }
}

/// Hand tier multiplying the stake: ordinary, Xì Dách (x2) or Xì Bàn (x3).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Tier {
    #[default]
    Normal,
    XiDach,
    XiBan,
}

impl Tier {
    pub fn multiplier(&self) -> i64 {
        match self {
            Tier::Normal => 1,
            Tier::XiDach => 2,
            Tier::XiBan => 3,
        }
    }

    pub fn is_special(&self) -> bool {
        *self > Tier::Normal
    }
}

impl TryFrom<u8> for Tier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Tier::Normal),
            2 => Ok(Tier::XiDach),
            3 => Ok(Tier::XiBan),
            other => Err(format!("tier must be 1, 2 or 3 (got {})", other)),
        }
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> Self {
        tier.multiplier() as u8
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.multiplier())
    }
}

/// One player's declaration for a round. Missing fields fall back to
/// bet 0, [`Outcome::Lose`] and [`Tier::Normal`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerBet {
    pub bet_amount: i64,
    pub result_outcome: Outcome,
    pub multiplier_tier: Tier,
}

impl PlayerBet {
    pub fn new(bet_amount: i64, result_outcome: Outcome, multiplier_tier: Tier) -> Self {
        Self {
            bet_amount,
            result_outcome,
            multiplier_tier,
        }
    }
}

/// Last submitted bet per player, used to seed the next round. Missing
/// players read as 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefaultBets(BTreeMap<PlayerId, i64>);

impl DefaultBets {
    pub fn get(&self, id: &PlayerId) -> i64 {
        self.0.get(id).copied().unwrap_or(0)
    }

    pub fn remember(&mut self, id: PlayerId, amount: i64) {
        self.0.insert(id, amount);
    }

    pub fn forget(&mut self, id: &PlayerId) {
        self.0.remove(id);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PlayerId, i64)> {
        self.0.iter().map(|(id, a)| (id, *a))
    }
}

/// Result of settling one betting round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BetSettlement {
    pub changes: ScoreChanges,
    pub dealer_delta: i64,
    pub big_win: bool,
    pub description: &'static str,
}

/// Delta for one non-dealer player. Bets outside `0..=MAX_BET` are
/// rejected by [`settle_round`]; here they saturate rather than overflow.
///
/// # Examples
///
/// ```
/// use diemso_engine::bet::{player_delta, Outcome, PlayerBet, Tier};
///
/// // Ordinary dealer, player wins normally
/// assert_eq!(player_delta(&PlayerBet::new(10, Outcome::Win, Tier::Normal), Tier::Normal), 10);
/// // Dealer Xì Bàn beats a player Xì Dách
/// assert_eq!(player_delta(&PlayerBet::new(10, Outcome::Win, Tier::XiDach), Tier::XiBan), -30);
/// ```
pub fn player_delta(entry: &PlayerBet, dealer_tier: Tier) -> i64 {
    let bet = entry.bet_amount;
    let pm = entry.multiplier_tier;
    if dealer_tier.is_special() {
        if pm == dealer_tier {
            0
        } else if pm > dealer_tier {
            bet.saturating_mul(pm.multiplier())
        } else {
            bet.saturating_mul(dealer_tier.multiplier()).saturating_neg()
        }
    } else if pm.is_special() {
        bet.saturating_mul(pm.multiplier())
    } else {
        match entry.result_outcome {
            Outcome::Win => bet,
            Outcome::Lose => bet.saturating_neg(),
            Outcome::Draw => 0,
        }
    }
}

/// Settles `active` players against `dealer`.
///
/// Every active player gets an entry (zero included) and the dealer takes
/// the negated sum, so the round always balances. Players absent from
/// `bets` settle as a zero bet.
///
/// # Errors
///
/// - [`EngineError::NegativeBet`] / [`EngineError::BetTooLarge`] - a bet
///   outside `0..=MAX_BET`
/// - [`EngineError::ScoreOverflow`] - the dealer's net would not fit in `i64`
pub fn settle_round(
    active: &[PlayerId],
    dealer: &PlayerId,
    bets: &BTreeMap<PlayerId, PlayerBet>,
    dealer_tier: Tier,
) -> Result<BetSettlement, EngineError> {
    let mut changes = ScoreChanges::new();
    let mut dealer_delta = 0i64;
    let mut any_special = false;

    for id in active.iter().filter(|id| *id != dealer) {
        let entry = bets.get(id).copied().unwrap_or_default();
        validate_bet(id, entry.bet_amount)?;
        any_special |= entry.multiplier_tier.is_special();
        let delta = player_delta(&entry, dealer_tier);
        changes.set(id.clone(), delta);
        dealer_delta = dealer_delta
            .checked_sub(delta)
            .ok_or_else(|| EngineError::ScoreOverflow(dealer.clone()))?;
    }
    changes.set(dealer.clone(), dealer_delta);

    let big_win =
        any_special || dealer_tier.is_special() || dealer_delta > BIG_WIN_THRESHOLD;
    let description = if dealer_tier.is_special() {
        DEALER_SPECIAL_DESCRIPTION
    } else {
        ROUND_RESULT_DESCRIPTION
    };

    Ok(BetSettlement {
        changes,
        dealer_delta,
        big_win,
        description,
    })
}

/// A round being collected: one entry per active player in seating order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundDraft {
    dealer_tier: Tier,
    seats: Vec<(PlayerId, PlayerBet)>,
}

impl RoundDraft {
    /// Seeds each active player with the remembered bet, or `starting_bet`
    /// when none (or zero) is remembered.
    pub fn open(active: &[PlayerId], defaults: &DefaultBets, starting_bet: i64) -> Self {
        let seats = active
            .iter()
            .map(|id| {
                let remembered = defaults.get(id);
                let bet = if remembered > 0 { remembered } else { starting_bet };
                (id.clone(), PlayerBet::new(bet, Outcome::Lose, Tier::Normal))
            })
            .collect();
        Self {
            dealer_tier: Tier::Normal,
            seats,
        }
    }

    pub fn dealer_tier(&self) -> Tier {
        self.dealer_tier
    }

    pub fn set_dealer_tier(&mut self, tier: Tier) {
        self.dealer_tier = tier;
    }

    pub fn entry(&self, id: &PlayerId) -> Option<&PlayerBet> {
        self.seats.iter().find(|(p, _)| p == id).map(|(_, b)| b)
    }

    pub fn seats(&self) -> impl Iterator<Item = (&PlayerId, &PlayerBet)> {
        self.seats.iter().map(|(id, b)| (id, b))
    }

    fn entry_mut(&mut self, id: &PlayerId) -> Result<&mut PlayerBet, EngineError> {
        self.seats
            .iter_mut()
            .find(|(p, _)| p == id)
            .map(|(_, b)| b)
            .ok_or_else(|| EngineError::UnknownPlayer(id.to_string()))
    }

    pub fn set_bet(&mut self, id: &PlayerId, amount: i64) -> Result<(), EngineError> {
        validate_bet(id, amount)?;
        self.entry_mut(id)?.bet_amount = amount;
        Ok(())
    }

    pub fn set_outcome(&mut self, id: &PlayerId, outcome: Outcome) -> Result<(), EngineError> {
        self.entry_mut(id)?.result_outcome = outcome;
        Ok(())
    }

    /// Sets a player's hand tier. Against an ordinary dealer a special hand
    /// also marks the player as winning.
    pub fn set_tier(&mut self, id: &PlayerId, tier: Tier) -> Result<(), EngineError> {
        let dealer_normal = !self.dealer_tier.is_special();
        let entry = self.entry_mut(id)?;
        entry.multiplier_tier = tier;
        if dealer_normal && tier.is_special() {
            entry.result_outcome = Outcome::Win;
        }
        Ok(())
    }

    /// Dealer beats everyone: every result becomes LOSE.
    pub fn dealer_takes_all(&mut self) {
        self.seats
            .iter_mut()
            .for_each(|(_, b)| b.result_outcome = Outcome::Lose);
    }

    pub fn draw_all(&mut self) {
        self.seats
            .iter_mut()
            .for_each(|(_, b)| b.result_outcome = Outcome::Draw);
    }

    /// Copies the first seat's bet to every seat.
    pub fn copy_first_bet(&mut self) {
        let Some(amount) = self.seats.first().map(|(_, b)| b.bet_amount) else {
            return;
        };
        self.seats.iter_mut().for_each(|(_, b)| b.bet_amount = amount);
    }

    pub fn active_players(&self) -> Vec<PlayerId> {
        self.seats.iter().map(|(id, _)| id.clone()).collect()
    }

    pub fn bets(&self) -> BTreeMap<PlayerId, PlayerBet> {
        self.seats.iter().cloned().collect()
    }
}
