//! `tienlen rules`: show or change the session's rank points.

use std::io::Write;

use diemso_engine::rank::RankPoints;
use diemso_engine::session::Game;
use diemso_engine::storage::SessionStore;

use crate::commands::{load_session, save_session};
use crate::error::CliError;
use crate::formatters::format_rank_points;

/// Point overrides from the command line; `None` keeps the current value.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleOverrides {
    pub first: Option<i64>,
    pub second: Option<i64>,
    pub third: Option<i64>,
    pub last: Option<i64>,
    pub pig_black: Option<i64>,
    pub pig_red: Option<i64>,
}

impl RuleOverrides {
    pub fn is_empty(&self) -> bool {
        [
            self.first,
            self.second,
            self.third,
            self.last,
            self.pig_black,
            self.pig_red,
        ]
        .iter()
        .all(Option::is_none)
    }

    fn apply(&self, base: RankPoints) -> RankPoints {
        RankPoints {
            first: self.first.unwrap_or(base.first),
            second: self.second.unwrap_or(base.second),
            third: self.third.unwrap_or(base.third),
            last: self.last.unwrap_or(base.last),
            pig_black: self.pig_black.unwrap_or(base.pig_black),
            pig_red: self.pig_red.unwrap_or(base.pig_red),
        }
    }
}

/// Without overrides prints the current points; otherwise validates and
/// saves the merged values. Recorded rounds are not rescored.
pub fn handle_rules_command(
    overrides: RuleOverrides,
    store: &mut dyn SessionStore,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let state = load_session(store, Game::TienLen, err)?;
    let current = state.rank_points().copied().unwrap_or_default();
    let shown = if overrides.is_empty() {
        current
    } else {
        let next = state.update_rules(overrides.apply(current))?;
        save_session(store, &next)?;
        writeln!(out, "Rank points updated; earlier rounds keep their scores.")?;
        next.rank_points().copied().unwrap_or_default()
    };
    for line in format_rank_points(&shown) {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}
