use std::io::{BufRead, Write};

use diemso_engine::session::Game;
use diemso_engine::storage::SessionStore;

use crate::commands::{load_session, save_session};
use crate::error::CliError;
use crate::io_utils::read_stdin_line;

/// Zeroes every score and clears the history after a y/N confirmation
/// (skipped with `yes`). Players, rules, dealer and remembered bets stay.
pub fn handle_reset_command(
    game: Game,
    yes: bool,
    store: &mut dyn SessionStore,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    let state = load_session(store, game, err)?;
    if !yes {
        write!(
            out,
            "Reset {} scores and delete {} round(s)? [y/N] ",
            game,
            state.history().len()
        )?;
        out.flush()?;
        let answer = read_stdin_line(stdin).unwrap_or_default();
        if !matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes") {
            writeln!(out)?;
            return Err(CliError::Interrupted("reset cancelled".into()));
        }
    }
    let next = state.reset();
    save_session(store, &next)?;
    writeln!(out, "{} scores reset.", game)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use diemso_engine::player::Player;
    use diemso_engine::session::SessionState;
    use diemso_engine::storage::MemoryStore;
    use std::io::Cursor;

    fn store() -> MemoryStore {
        let state = SessionState::new_xi_dach(
            vec![Player::new("d", "Dung"), Player::new("a", "An")],
            None,
        )
        .unwrap()
        .submit_round(&Default::default(), diemso_engine::bet::Tier::XiBan)
        .unwrap()
        .state;
        let mut store = MemoryStore::new();
        store.try_save("xidach", &state).unwrap();
        store
    }

    fn rounds(store: &MemoryStore) -> usize {
        store.try_load("xidach").unwrap().unwrap().history().len()
    }

    #[test]
    fn declined_prompt_is_an_interruption() {
        let mut store = store();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut stdin = Cursor::new(b"n\n".to_vec());
        let res = handle_reset_command(Game::XiDach, false, &mut store, &mut out, &mut err, &mut stdin);
        assert!(matches!(res, Err(CliError::Interrupted(_))));
        assert!(String::from_utf8(out).unwrap().contains("[y/N]"));
        assert_eq!(rounds(&store), 1);
    }

    #[test]
    fn eof_counts_as_no() {
        let mut store = store();
        let mut stdin = Cursor::new(Vec::new());
        let res = handle_reset_command(
            Game::XiDach,
            false,
            &mut store,
            &mut Vec::new(),
            &mut Vec::new(),
            &mut stdin,
        );
        assert!(matches!(res, Err(CliError::Interrupted(_))));
    }

    #[test]
    fn confirmed_prompt_resets() {
        let mut store = store();
        let mut stdin = Cursor::new(b"YES\n".to_vec());
        handle_reset_command(
            Game::XiDach,
            false,
            &mut store,
            &mut Vec::new(),
            &mut Vec::new(),
            &mut stdin,
        )
        .unwrap();
        assert_eq!(rounds(&store), 0);
    }
}
