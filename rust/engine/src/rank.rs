//! Tiến Lên scoring: finishing-order rounds and pig penalties.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::EngineError;
use crate::ledger::ScoreChanges;
use crate::player::PlayerId;

pub const RANKING_DESCRIPTION: &str = "Ranking";

/// Point values for a Tiến Lên session.
///
/// Ranking rounds are zero-sum only when the values are symmetric
/// (`first == -last` and `second == -third`); see [`RankPoints::is_symmetric`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct RankPoints {
    pub first: i64,
    pub second: i64,
    pub third: i64,
    pub last: i64,
    pub pig_black: i64,
    pub pig_red: i64,
}

impl Default for RankPoints {
    fn default() -> Self {
        Self {
            first: 5,
            second: 3,
            third: -3,
            last: -5,
            pig_black: 3,
            pig_red: 5,
        }
    }
}

impl RankPoints {
    /// Rejects orderings where a better finish earns less than a worse one,
    /// and negative pig values.
    ///
    /// # Examples
    ///
    /// ```
    /// use diemso_engine::rank::RankPoints;
    ///
    /// assert!(RankPoints::default().validate().is_ok());
    ///
    /// let inverted = RankPoints { first: -5, last: 5, ..RankPoints::default() };
    /// assert!(inverted.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.first >= self.second && self.second >= self.third && self.third >= self.last) {
            return Err(EngineError::InvalidRankPoints(format!(
                "expected FIRST >= SECOND >= THIRD >= LAST, got {} / {} / {} / {}",
                self.first, self.second, self.third, self.last
            )));
        }
        if self.pig_black < 0 || self.pig_red < 0 {
            return Err(EngineError::InvalidRankPoints(
                "pig penalties must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_symmetric(&self) -> bool {
        self.first == -self.last && self.second == -self.third
    }

    pub fn penalty(&self, kind: PenaltyKind) -> i64 {
        match kind {
            PenaltyKind::Black => self.pig_black,
            PenaltyKind::Red => self.pig_red,
        }
    }
}

/// The two pig ("heo") penalty kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PenaltyKind {
    Black,
    Red,
}

impl PenaltyKind {
    pub fn description(&self) -> &'static str {
        match self {
            PenaltyKind::Black => "Penalty: black pig",
            PenaltyKind::Red => "Penalty: red pig",
        }
    }
}

impl fmt::Display for PenaltyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PenaltyKind::Black => f.write_str("black"),
            PenaltyKind::Red => f.write_str("red"),
        }
    }
}

/// Deltas for a finishing order given best to worst.
///
/// First and last always score. SECOND and THIRD apply only when four or
/// more players are ranked; with exactly three the middle finisher gets an
/// explicit 0. Players left out of `finishers` are not scored.
///
/// Total for any input: a list shorter than two yields whatever entries it
/// can (a single finisher is both first and last).
///
/// # Examples
///
/// ```
/// use diemso_engine::player::PlayerId;
/// use diemso_engine::rank::{settle_ranking, RankPoints};
///
/// let order: Vec<PlayerId> = ["a", "b", "c"].into_iter().map(PlayerId::from).collect();
/// let changes = settle_ranking(&order, &RankPoints::default());
/// assert_eq!(changes.get(&PlayerId::from("a")), 5);
/// assert_eq!(changes.get(&PlayerId::from("b")), 0);
/// assert!(changes.contains(&PlayerId::from("b")));
/// assert_eq!(changes.get(&PlayerId::from("c")), -5);
/// ```
pub fn settle_ranking(finishers: &[PlayerId], points: &RankPoints) -> ScoreChanges {
    let mut changes = ScoreChanges::new();
    let n = finishers.len();
    let (Some(first), Some(last)) = (finishers.first(), finishers.last()) else {
        return changes;
    };
    changes.add(first.clone(), points.first);
    changes.add(last.clone(), points.last);
    if n >= 4 {
        changes.add(finishers[1].clone(), points.second);
        changes.add(finishers[2].clone(), points.third);
    } else if n == 3 {
        changes.add(finishers[1].clone(), 0);
    }
    changes
}

/// Two-party pig penalty transfer; always zero-sum.
pub fn settle_penalty(
    winner: &PlayerId,
    loser: &PlayerId,
    kind: PenaltyKind,
    points: &RankPoints,
) -> ScoreChanges {
    let amount = points.penalty(kind);
    let mut changes = ScoreChanges::new();
    changes.add(winner.clone(), amount);
    changes.add(loser.clone(), -amount);
    changes
}
