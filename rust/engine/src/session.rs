use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::bet::{settle_round, DefaultBets, PlayerBet, RoundDraft, Tier};
use crate::errors::EngineError;
use crate::ledger::{History, Ledger, LedgerIssue, RoundRecord, ScoreChanges};
use crate::notify::Feedback;
use crate::player::{
    contains_player, validate_name, Player, PlayerId, MIN_PLAYERS,
};
use crate::rank::{settle_penalty, settle_ranking, PenaltyKind, RankPoints, RANKING_DESCRIPTION};
use crate::rules::{
    validate_bet, validate_dealer, validate_draft, validate_penalty, validate_ranking,
};

/// Which game a session scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Game {
    TienLen,
    XiDach,
}

impl Game {
    /// Key the session is persisted under.
    pub fn storage_key(&self) -> &'static str {
        match self {
            Game::TienLen => "tienlen",
            Game::XiDach => "xidach",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Game::TienLen => "Tiến Lên",
            Game::XiDach => "Xì Dách",
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Game-specific configuration carried with the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum GameConfig {
    TienLen {
        #[serde(default)]
        rank_points: RankPoints,
    },
    XiDach {
        #[serde(default)]
        dealer_id: Option<PlayerId>,
        #[serde(default)]
        default_bets: DefaultBets,
    },
}

impl GameConfig {
    pub fn game(&self) -> Game {
        match self {
            GameConfig::TienLen { .. } => Game::TienLen,
            GameConfig::XiDach { .. } => Game::XiDach,
        }
    }
}

/// Xì Dách round lifecycle. Settling a round moves straight back to idle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RoundPhase {
    #[default]
    Idle,
    Collecting(RoundDraft),
}

/// What a settlement produced, for the caller and the notification port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOutcome {
    pub record: RoundRecord,
    pub big_win: bool,
    pub description: String,
    pub feedback: Feedback,
}

/// Next session value plus the outcome of the round that produced it.
#[derive(Debug, Clone)]
pub struct Settled {
    pub state: SessionState,
    pub outcome: RoundOutcome,
}

/// Final standings split by sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary<'a> {
    pub winners: Vec<&'a Player>,
    pub losers: Vec<&'a Player>,
}

/// Roster, history and game configuration: the unit persisted between runs.
///
/// Every operation takes `&self` and returns a new value; the caller owns the
/// current state and replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredSession")]
pub struct SessionState {
    #[serde(flatten)]
    ledger: Ledger,
    game_config: GameConfig,
    /// Sequence number of the last recorded round; never rolled back.
    #[serde(default)]
    round_seq: u32,
    #[serde(skip)]
    phase: RoundPhase,
}

/// On-disk shape of [`SessionState`]. `roundSeq` may be missing or stale in
/// older or hand-edited files, so it is recovered from the history on load.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    #[serde(flatten)]
    ledger: Ledger,
    game_config: GameConfig,
    #[serde(default)]
    round_seq: u32,
}

impl From<StoredSession> for SessionState {
    fn from(stored: StoredSession) -> Self {
        let round_seq = recovered_seq(stored.round_seq, stored.ledger.history());
        Self {
            ledger: stored.ledger,
            game_config: stored.game_config,
            round_seq,
            phase: RoundPhase::Idle,
        }
    }
}

/// Lowest sequence number that cannot collide with a recorded round id.
fn recovered_seq(stored: u32, history: &History) -> u32 {
    let len = u32::try_from(history.len()).unwrap_or(u32::MAX);
    stored.max(len).max(history.max_seq().unwrap_or(0))
}

impl SessionState {
    pub fn new_tien_len(players: Vec<Player>, rank_points: RankPoints) -> Result<Self, EngineError> {
        ensure_roster(&players)?;
        rank_points.validate()?;
        Ok(Self::from_config(
            players,
            GameConfig::TienLen { rank_points },
        ))
    }

    /// New Xì Dách session. Without an explicit dealer the first player deals.
    pub fn new_xi_dach(players: Vec<Player>, dealer: Option<PlayerId>) -> Result<Self, EngineError> {
        ensure_roster(&players)?;
        let dealer = match dealer {
            Some(id) => validate_dealer(&players, Some(&id))?.clone(),
            None => players[0].id().clone(),
        };
        Ok(Self::from_config(
            players,
            GameConfig::XiDach {
                dealer_id: Some(dealer),
                default_bets: DefaultBets::default(),
            },
        ))
    }

    /// Session restored from its parts. Round numbering continues after the
    /// highest recorded id, so ids freed by an earlier undo are not reissued.
    pub fn from_parts(players: Vec<Player>, history: History, game_config: GameConfig) -> Self {
        let round_seq = recovered_seq(0, &history);
        Self {
            ledger: Ledger::from_parts(players, history),
            game_config,
            round_seq,
            phase: RoundPhase::Idle,
        }
    }

    fn from_config(players: Vec<Player>, game_config: GameConfig) -> Self {
        Self {
            ledger: Ledger::new(players),
            game_config,
            round_seq: 0,
            phase: RoundPhase::Idle,
        }
    }

    pub fn game(&self) -> Game {
        self.game_config.game()
    }
    pub fn players(&self) -> &[Player] {
        self.ledger.players()
    }
    pub fn history(&self) -> &History {
        self.ledger.history()
    }
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }
    pub fn config(&self) -> &GameConfig {
        &self.game_config
    }
    pub fn phase(&self) -> &RoundPhase {
        &self.phase
    }

    pub fn rank_points(&self) -> Option<&RankPoints> {
        match &self.game_config {
            GameConfig::TienLen { rank_points } => Some(rank_points),
            GameConfig::XiDach { .. } => None,
        }
    }

    pub fn dealer_id(&self) -> Option<&PlayerId> {
        match &self.game_config {
            GameConfig::XiDach { dealer_id, .. } => dealer_id.as_ref(),
            GameConfig::TienLen { .. } => None,
        }
    }

    pub fn default_bets(&self) -> Option<&DefaultBets> {
        match &self.game_config {
            GameConfig::XiDach { default_bets, .. } => Some(default_bets),
            GameConfig::TienLen { .. } => None,
        }
    }

    pub fn draft(&self) -> Option<&RoundDraft> {
        match &self.phase {
            RoundPhase::Collecting(draft) => Some(draft),
            RoundPhase::Idle => None,
        }
    }

    /// Players who settle against the dealer, in seating order.
    pub fn active_players(&self) -> Vec<PlayerId> {
        let dealer = self.dealer_id();
        self.players()
            .iter()
            .map(|p| p.id().clone())
            .filter(|id| Some(id) != dealer)
            .collect()
    }

    // ---------------------------------------------------------------------
    // Roster

    pub fn add_player(&self, name: &str) -> Result<Self, EngineError> {
        self.ensure_roster_open()?;
        let name = validate_name(self.players(), name)?;
        let mut next = self.clone();
        let player = Player::new(PlayerId::generate(), name);
        if let GameConfig::XiDach { dealer_id, .. } = &mut next.game_config {
            if dealer_id.is_none() {
                *dealer_id = Some(player.id().clone());
            }
        }
        next.ledger.players.push(player);
        Ok(next)
    }

    /// Removes a player before any round has been recorded. A removed dealer
    /// is replaced by the first remaining player.
    pub fn remove_player(&self, id: &PlayerId) -> Result<Self, EngineError> {
        self.ensure_roster_open()?;
        if !contains_player(self.players(), id) {
            return Err(EngineError::UnknownPlayer(id.to_string()));
        }
        let mut next = self.clone();
        next.ledger.players.retain(|p| p.id() != id);
        let first = next.ledger.players.first().map(|p| p.id().clone());
        if let GameConfig::XiDach {
            dealer_id,
            default_bets,
        } = &mut next.game_config
        {
            default_bets.forget(id);
            if dealer_id.as_ref() == Some(id) {
                *dealer_id = first;
            }
        }
        Ok(next)
    }

    fn ensure_roster_open(&self) -> Result<(), EngineError> {
        if !self.history().is_empty() {
            return Err(EngineError::RosterLocked);
        }
        if matches!(self.phase, RoundPhase::Collecting(_)) {
            return Err(EngineError::RoundInProgress);
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Tiến Lên

    pub fn submit_ranking(&self, finishers: &[PlayerId]) -> Result<Settled, EngineError> {
        let points = *self.require_rank_points()?;
        ensure_roster(self.players())?;
        validate_ranking(self.players(), finishers)?;
        let changes = settle_ranking(finishers, &points);
        self.record(RANKING_DESCRIPTION, changes, true, Feedback::Celebrate)
    }

    pub fn submit_penalty(
        &self,
        winner: &PlayerId,
        loser: &PlayerId,
        kind: PenaltyKind,
    ) -> Result<Settled, EngineError> {
        let points = *self.require_rank_points()?;
        validate_penalty(self.players(), winner, loser)?;
        let changes = settle_penalty(winner, loser, kind, &points);
        self.record(kind.description(), changes, false, Feedback::Coin)
    }

    /// Replaces the point values used by later rounds; recorded rounds keep
    /// the deltas they were settled with.
    pub fn update_rules(&self, points: RankPoints) -> Result<Self, EngineError> {
        self.require_rank_points()?;
        points.validate()?;
        let mut next = self.clone();
        next.game_config = GameConfig::TienLen {
            rank_points: points,
        };
        Ok(next)
    }

    fn require_rank_points(&self) -> Result<&RankPoints, EngineError> {
        self.rank_points().ok_or(EngineError::WrongGame {
            expected: "Tiến Lên",
        })
    }

    // ---------------------------------------------------------------------
    // Xì Dách

    /// Enters COLLECTING, seeding every active player's bet from the
    /// remembered defaults.
    pub fn open_round(&self, starting_bet: i64) -> Result<Self, EngineError> {
        let (_, defaults) = self.require_xi_dach()?;
        if matches!(self.phase, RoundPhase::Collecting(_)) {
            return Err(EngineError::RoundInProgress);
        }
        validate_dealer(self.players(), self.dealer_id())?;
        let active = self.active_players();
        if active.is_empty() {
            return Err(EngineError::NoActivePlayers);
        }
        let draft = RoundDraft::open(&active, defaults, starting_bet);
        let mut next = self.clone();
        next.phase = RoundPhase::Collecting(draft);
        Ok(next)
    }

    /// Applies an edit to the round being collected.
    pub fn edit_round<F>(&self, edit: F) -> Result<Self, EngineError>
    where
        F: FnOnce(&mut RoundDraft) -> Result<(), EngineError>,
    {
        let mut next = self.clone();
        match &mut next.phase {
            RoundPhase::Collecting(draft) => edit(draft)?,
            RoundPhase::Idle => return Err(EngineError::NoRoundInProgress),
        }
        Ok(next)
    }

    pub fn cancel_round(&self) -> Result<Self, EngineError> {
        if matches!(self.phase, RoundPhase::Idle) {
            return Err(EngineError::NoRoundInProgress);
        }
        let mut next = self.clone();
        next.phase = RoundPhase::Idle;
        Ok(next)
    }

    /// Settles the round being collected and returns to IDLE.
    pub fn settle_round(&self) -> Result<Settled, EngineError> {
        let RoundPhase::Collecting(draft) = &self.phase else {
            return Err(EngineError::NoRoundInProgress);
        };
        let dealer = validate_dealer(self.players(), self.dealer_id())?.clone();
        validate_draft(self.players(), &dealer, draft)?;
        self.settle_bets(
            &draft.active_players(),
            &dealer,
            &draft.bets(),
            draft.dealer_tier(),
        )
    }

    /// One-shot settlement of a full set of declarations, bypassing the
    /// COLLECTING state. Active players missing from `bets` settle as 0.
    pub fn submit_round(
        &self,
        bets: &BTreeMap<PlayerId, PlayerBet>,
        dealer_tier: Tier,
    ) -> Result<Settled, EngineError> {
        self.require_xi_dach()?;
        if matches!(self.phase, RoundPhase::Collecting(_)) {
            return Err(EngineError::RoundInProgress);
        }
        let dealer = validate_dealer(self.players(), self.dealer_id())?.clone();
        let active = self.active_players();
        if active.is_empty() {
            return Err(EngineError::NoActivePlayers);
        }
        for (id, entry) in bets {
            validate_bet(id, entry.bet_amount)?;
        }
        self.settle_bets(&active, &dealer, bets, dealer_tier)
    }

    fn settle_bets(
        &self,
        active: &[PlayerId],
        dealer: &PlayerId,
        bets: &BTreeMap<PlayerId, PlayerBet>,
        dealer_tier: Tier,
    ) -> Result<Settled, EngineError> {
        let settlement = settle_round(active, dealer, bets, dealer_tier)?;
        let feedback = Feedback::for_round(settlement.big_win);
        let mut settled = self.record(
            settlement.description,
            settlement.changes,
            settlement.big_win,
            feedback,
        )?;
        if let GameConfig::XiDach { default_bets, .. } = &mut settled.state.game_config {
            for id in active.iter().filter(|id| *id != dealer) {
                if let Some(entry) = bets.get(id) {
                    default_bets.remember(id.clone(), entry.bet_amount);
                }
            }
        }
        settled.state.phase = RoundPhase::Idle;
        Ok(settled)
    }

    /// Hands the dealer role to another seated player. History and scores
    /// are untouched.
    pub fn change_dealer(&self, id: &PlayerId) -> Result<Self, EngineError> {
        self.require_xi_dach()?;
        if matches!(self.phase, RoundPhase::Collecting(_)) {
            return Err(EngineError::RoundInProgress);
        }
        validate_dealer(self.players(), Some(id))?;
        let mut next = self.clone();
        if let GameConfig::XiDach { dealer_id, .. } = &mut next.game_config {
            *dealer_id = Some(id.clone());
        }
        tracing::info!(dealer = %id, "dealer changed");
        Ok(next)
    }

    fn require_xi_dach(&self) -> Result<(Option<&PlayerId>, &DefaultBets), EngineError> {
        match &self.game_config {
            GameConfig::XiDach {
                dealer_id,
                default_bets,
            } => Ok((dealer_id.as_ref(), default_bets)),
            GameConfig::TienLen { .. } => Err(EngineError::WrongGame {
                expected: "Xì Dách",
            }),
        }
    }

    // ---------------------------------------------------------------------
    // Shared

    /// Reverses the most recent round. With no history this returns an
    /// identical state and `None`.
    pub fn undo(&self) -> (Self, Option<RoundRecord>) {
        let undone = self.history().latest().cloned();
        let mut next = self.clone();
        next.ledger = self.ledger.undo_last();
        if let Some(record) = &undone {
            tracing::debug!(round = %record.id, description = %record.description, "round undone");
        }
        (next, undone)
    }

    /// Zeroes every score and clears the history. Configuration, dealer
    /// and remembered bets are kept.
    pub fn reset(&self) -> Self {
        let mut next = self.clone();
        next.ledger = self.ledger.cleared();
        next.phase = RoundPhase::Idle;
        tracing::info!(game = %self.game(), "session reset");
        next
    }

    /// Players sorted by score, highest first.
    pub fn standings(&self) -> Vec<&Player> {
        let mut sorted: Vec<&Player> = self.players().iter().collect();
        sorted.sort_by(|a, b| b.score().cmp(&a.score()));
        sorted
    }

    pub fn summary(&self) -> Summary<'_> {
        let standings = self.standings();
        let winners = standings.iter().copied().filter(|p| p.score() > 0).collect();
        let mut losers: Vec<&Player> =
            standings.iter().copied().filter(|p| p.score() < 0).collect();
        losers.sort_by_key(|p| p.score());
        Summary { winners, losers }
    }

    pub fn audit(&self) -> Vec<LedgerIssue> {
        self.ledger.audit()
    }

    fn record(
        &self,
        description: &str,
        changes: ScoreChanges,
        big_win: bool,
        feedback: Feedback,
    ) -> Result<Settled, EngineError> {
        self.ledger.check_apply(&changes)?;
        let seq = self.round_seq.saturating_add(1);
        let record = RoundRecord::new(seq, Utc::now(), description, changes);
        tracing::debug!(
            round = %record.id,
            description,
            players = record.score_changes.len(),
            big_win,
            "round recorded"
        );
        let mut state = self.clone();
        state.ledger = self.ledger.apply(record.clone());
        state.round_seq = seq;
        Ok(Settled {
            state,
            outcome: RoundOutcome {
                record,
                big_win,
                description: description.to_string(),
                feedback,
            },
        })
    }
}

fn ensure_roster(players: &[Player]) -> Result<(), EngineError> {
    if players.len() < MIN_PLAYERS {
        return Err(EngineError::NotEnoughPlayers {
            minimum: MIN_PLAYERS,
            actual: players.len(),
        });
    }
    Ok(())
}
