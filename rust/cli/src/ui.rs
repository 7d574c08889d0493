//! UI helper functions for terminal output formatting.
//!
//! Error and warning prefixes are shared across commands, and
//! [`TerminalNotifier`] turns round feedback into terminal banners.

use std::io::Write;

use diemso_engine::ledger::RoundRecord;
use diemso_engine::notify::{Feedback, Notifier};

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Display a warning message to stderr with "WARNING:" prefix
pub fn display_warning(err: &mut dyn Write, message: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: {}", message)
}

/// Display parameter ignored warning
pub fn warn_parameter_unused(err: &mut dyn Write, param_name: &str) -> std::io::Result<()> {
    writeln!(
        err,
        "WARNING: Parameter --{} is not used by this game.",
        param_name
    )
}

/// Prints a one-line banner for every recorded or undone round.
pub struct TerminalNotifier<'a> {
    out: &'a mut dyn Write,
}

impl<'a> TerminalNotifier<'a> {
    pub fn new(out: &'a mut dyn Write) -> Self {
        Self { out }
    }
}

impl Notifier for TerminalNotifier<'_> {
    fn notify(&mut self, record: &RoundRecord, big_win: bool, description: &str) {
        // Output errors are ignored here; the handler's own writes report them.
        let banner = Feedback::for_round(big_win).banner();
        let _ = writeln!(self.out, "{} {} [{}]", banner, description, record.id);
    }

    fn undone(&mut self, record: &RoundRecord) {
        let _ = writeln!(
            self.out,
            "{} {} [{}]",
            Feedback::Click.banner(),
            record.description,
            record.id
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use diemso_engine::ledger::ScoreChanges;

    #[test]
    fn big_win_gets_a_banner() {
        let record = RoundRecord::new(1, Utc::now(), "Dealer special hand", ScoreChanges::new());
        let mut out = Vec::new();
        TerminalNotifier::new(&mut out).notify(&record, true, &record.description);
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("*** BIG WIN ***"));
        assert!(text.contains(&record.id));
    }

    #[test]
    fn undo_is_reported() {
        let record = RoundRecord::new(7, Utc::now(), "Ranking", ScoreChanges::new());
        let mut out = Vec::new();
        TerminalNotifier::new(&mut out).undone(&record);
        assert!(String::from_utf8(out).unwrap().starts_with("Undone: Ranking"));
    }
}
