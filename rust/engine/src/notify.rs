//! Observational hooks fired after a round is recorded or undone.
//!
//! Nothing here feeds back into scoring; a notifier only sees the record and
//! its classification.

use serde::Serialize;

use crate::ledger::RoundRecord;

/// Kind of feedback a front end should give for a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    /// Ranking rounds and big-win betting rounds
    Celebrate,
    /// Penalties and ordinary betting rounds
    Coin,
    /// Undo
    Click,
}

impl Feedback {
    /// Feedback for a settled round given its big-win classification.
    pub fn for_round(big_win: bool) -> Self {
        if big_win {
            Feedback::Celebrate
        } else {
            Feedback::Coin
        }
    }

    /// Short text prefix for line-oriented front ends.
    pub fn banner(&self) -> &'static str {
        match self {
            Feedback::Celebrate => "*** BIG WIN ***",
            Feedback::Coin => "Recorded:",
            Feedback::Click => "Undone:",
        }
    }
}

/// Receives every settlement; `undone` corresponds to [`Feedback::Click`].
pub trait Notifier {
    fn notify(&mut self, record: &RoundRecord, big_win: bool, description: &str);

    fn undone(&mut self, _record: &RoundRecord) {}
}

/// Keeps every notification in memory, in arrival order.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    pub settled: Vec<(String, bool, String)>,
    pub undone: Vec<String>,
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, record: &RoundRecord, big_win: bool, description: &str) {
        self.settled
            .push((record.id.clone(), big_win, description.to_string()));
    }

    fn undone(&mut self, record: &RoundRecord) {
        self.undone.push(record.id.clone());
    }
}
