use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

use crate::errors::EngineError;
use crate::player::{Player, PlayerId};

/// Per-player score deltas for one round.
///
/// A player without an entry has a delta of 0; [`ScoreChanges::get`] never
/// reports a missing key as anything else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreChanges(BTreeMap<PlayerId, i64>);

impl ScoreChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &PlayerId) -> i64 {
        self.0.get(id).copied().unwrap_or(0)
    }

    /// Records an explicit delta, replacing any earlier entry for the player.
    pub fn set(&mut self, id: PlayerId, delta: i64) {
        self.0.insert(id, delta);
    }

    pub fn add(&mut self, id: PlayerId, delta: i64) {
        *self.0.entry(id).or_insert(0) += delta;
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.0.contains_key(id)
    }

    /// Sum of all deltas; 0 for every balanced round. Saturates on
    /// snapshots too large to add up.
    pub fn total(&self) -> i64 {
        let total = self.wide_total();
        i64::try_from(total).unwrap_or(if total < 0 { i64::MIN } else { i64::MAX })
    }

    pub fn is_zero_sum(&self) -> bool {
        self.wide_total() == 0
    }

    fn wide_total(&self) -> i128 {
        self.0.values().map(|&d| i128::from(d)).sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PlayerId, i64)> {
        self.0.iter().map(|(id, d)| (id, *d))
    }
}

impl FromIterator<(PlayerId, i64)> for ScoreChanges {
    fn from_iter<T: IntoIterator<Item = (PlayerId, i64)>>(iter: T) -> Self {
        let mut changes = ScoreChanges::new();
        for (id, delta) in iter {
            changes.set(id, delta);
        }
        changes
    }
}

/// One scored event. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundRecord {
    /// Unique identifier (format: YYYYMMDD-NNNNNN)
    pub id: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Human-readable round label
    pub description: String,
    pub score_changes: ScoreChanges,
}

impl RoundRecord {
    pub fn new(
        seq: u32,
        at: DateTime<Utc>,
        description: impl Into<String>,
        score_changes: ScoreChanges,
    ) -> Self {
        Self {
            id: format_round_id(&at.format("%Y%m%d").to_string(), seq),
            timestamp: at.timestamp_millis(),
            description: description.into(),
            score_changes,
        }
    }

    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }
}

pub fn format_round_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

/// Rounds in most-recent-first order. New rounds enter at the front and undo
/// only ever removes the front.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History(VecDeque<RoundRecord>);

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<&RoundRecord> {
        self.0.front()
    }

    /// Iterates from the most recent round to the oldest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &RoundRecord> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn prepend(&mut self, record: RoundRecord) {
        self.0.push_front(record);
    }

    fn pop_latest(&mut self) -> Option<RoundRecord> {
        self.0.pop_front()
    }

    /// Highest sequence number among the recorded round ids, read from the
    /// `-NNNNNN` suffix. Ids that do not parse are skipped.
    pub fn max_seq(&self) -> Option<u32> {
        self.0
            .iter()
            .filter_map(|r| r.id.rsplit_once('-'))
            .filter_map(|(_, seq)| seq.parse::<u32>().ok())
            .max()
    }
}

impl FromIterator<RoundRecord> for History {
    /// Collects records given most-recent-first.
    fn from_iter<T: IntoIterator<Item = RoundRecord>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Problems found by [`Ledger::audit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerIssue {
    /// A record whose deltas do not sum to zero.
    NonZeroSum { round_id: String, total: i64 },
    /// A running score that disagrees with its opening score plus the
    /// replayed history.
    ScoreMismatch {
        player: PlayerId,
        expected: i64,
        actual: i64,
    },
}

/// Roster scores plus the history that produced them.
///
/// Scores a player was seated with (see [`Player::with_score`]) are kept as
/// opening scores so the audit can replay from them instead of from 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    pub(crate) players: Vec<Player>,
    pub(crate) history: History,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    opening_scores: BTreeMap<PlayerId, i64>,
}

impl Ledger {
    /// Starts an empty history; any non-zero score in `players` becomes that
    /// player's opening score.
    pub fn new(players: Vec<Player>) -> Self {
        let opening_scores = players
            .iter()
            .filter(|p| p.score() != 0)
            .map(|p| (p.id().clone(), p.score()))
            .collect();
        Self {
            players,
            history: History::new(),
            opening_scores,
        }
    }

    /// Restores a ledger from a snapshot without re-applying its history.
    /// Every score is assumed to have opened at 0.
    pub fn from_parts(players: Vec<Player>, history: History) -> Self {
        Self {
            players,
            history,
            opening_scores: BTreeMap::new(),
        }
    }

    pub fn opening_score(&self, id: &PlayerId) -> i64 {
        self.opening_scores.get(id).copied().unwrap_or(0)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Checks that `changes` can be added to every running score.
    pub fn check_apply(&self, changes: &ScoreChanges) -> Result<(), EngineError> {
        for p in &self.players {
            if p.score().checked_add(changes.get(p.id())).is_none() {
                return Err(EngineError::ScoreOverflow(p.id().clone()));
            }
        }
        Ok(())
    }

    /// Appends `record`. Callers check it with [`Ledger::check_apply`] first;
    /// an undo of an applied record never overflows.
    pub fn apply(&self, record: RoundRecord) -> Ledger {
        let (players, history) = apply(&self.players, &self.history, record);
        Ledger {
            players,
            history,
            opening_scores: self.opening_scores.clone(),
        }
    }

    pub fn undo_last(&self) -> Ledger {
        let (players, history) = undo_last(&self.players, &self.history);
        Ledger {
            players,
            history,
            opening_scores: self.opening_scores.clone(),
        }
    }

    /// Scores every player should have: opening score plus every delta in
    /// the history. Saturates on hand-edited snapshots.
    pub fn replayed_scores(&self) -> BTreeMap<PlayerId, i64> {
        self.players
            .iter()
            .map(|p| {
                let sum = self
                    .history
                    .iter()
                    .map(|r| r.score_changes.get(p.id()))
                    .fold(self.opening_score(p.id()), i64::saturating_add);
                (p.id().clone(), sum)
            })
            .collect()
    }

    /// Checks the zero-sum and score-consistency invariants, replaying from
    /// the opening scores.
    pub fn audit(&self) -> Vec<LedgerIssue> {
        let mut issues: Vec<LedgerIssue> = self
            .history
            .iter()
            .filter(|r| !r.score_changes.is_zero_sum())
            .map(|r| LedgerIssue::NonZeroSum {
                round_id: r.id.clone(),
                total: r.score_changes.total(),
            })
            .collect();
        let replayed = self.replayed_scores();
        for p in &self.players {
            let expected = replayed.get(p.id()).copied().unwrap_or(0);
            if expected != p.score() {
                issues.push(LedgerIssue::ScoreMismatch {
                    player: p.id().clone(),
                    expected,
                    actual: p.score(),
                });
            }
        }
        issues
    }

    pub(crate) fn cleared(&self) -> Ledger {
        let mut players = self.players.clone();
        players.iter_mut().for_each(Player::clear_score);
        Ledger::new(players)
    }
}

/// Adds `record`'s deltas to every player and prepends it to the history.
///
/// # Panics
///
/// In debug builds, if a score would leave the `i64` range; check with
/// [`Ledger::check_apply`] first.
pub fn apply(players: &[Player], history: &History, record: RoundRecord) -> (Vec<Player>, History) {
    let players = shift_scores(players, &record.score_changes, false);
    let mut history = history.clone();
    history.prepend(record);
    (players, history)
}

/// Reverses the most recent record. An empty history is returned unchanged.
pub fn undo_last(players: &[Player], history: &History) -> (Vec<Player>, History) {
    let mut history = history.clone();
    match history.pop_latest() {
        Some(record) => (shift_scores(players, &record.score_changes, true), history),
        None => (players.to_vec(), history),
    }
}

fn shift_scores(players: &[Player], changes: &ScoreChanges, undo: bool) -> Vec<Player> {
    players
        .iter()
        .map(|p| {
            let mut next = p.clone();
            let delta = changes.get(p.id());
            if undo {
                next.retract(delta);
            } else {
                next.adjust(delta);
            }
            next
        })
        .collect()
}
