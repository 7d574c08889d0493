//! # diemso CLI Library
//!
//! Command-line front end for the `diemso-engine` score ledger. Each game
//! keeps one saved session in the data directory; every command loads it,
//! applies one transition and saves it back.
//!
//! ## Main Entry Point
//!
//! The primary entry point is the [`run`] function, which parses command-line arguments
//! and executes the appropriate subcommand.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::io;
//! let args = vec!["diemso", "tienlen", "new", "--player", "An", "--player", "Binh"];
//! let code = diemso_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `tienlen new|add-player|remove-player|rank|pig|rules|show|summary|undo|reset|verify|export`
//! - `xidach new|add-player|remove-player|round|dealer|show|summary|undo|reset|verify|export`
//! - `cfg`: Display current configuration settings

use clap::Parser;
use std::io::Write;
pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod formatters;
pub mod io_utils;
pub mod logging;
pub mod ui;
pub mod validation;

use cli::{Commands, DiemsoCli, SessionCommand, TienLenCommand, XiDachCommand};
use commands::{
    RoundRequest, RuleOverrides, handle_add_player_command, handle_cfg_command,
    handle_dealer_command, handle_export_command, handle_new_command, handle_pig_command,
    handle_rank_command, handle_remove_player_command, handle_reset_command,
    handle_round_command, handle_rules_command, handle_show_command, handle_summary_command,
    handle_undo_command, handle_verify_command,
};
use config::Config;
use diemso_engine::session::Game;
use diemso_engine::storage::JsonFileStore;

pub use error::CliError;

/// Main entry point for the CLI application.
///
/// Parses command-line arguments and dispatches to the appropriate subcommand handler.
///
/// # Returns
///
/// Exit code: `0` for success, `2` for errors, `130` when a confirmation is declined
///
/// # Example
///
/// ```
/// use std::io;
/// let mut out = Vec::new();
/// let code = diemso_cli::run(["diemso", "--help"], &mut out, &mut io::stderr());
/// assert_eq!(code, 0);
/// assert!(String::from_utf8(out).unwrap().contains("tienlen"));
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    const COMMANDS: &[&str] = &["tienlen", "xidach", "cfg"];
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match DiemsoCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;

            // Help and version should print to stdout and exit 0
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => match write!(out, "{}", e) {
                    Ok(()) => exit_code::SUCCESS,
                    Err(_) => exit_code::ERROR,
                },
                _ => {
                    let _ = write_usage(err, &e, COMMANDS);
                    exit_code::ERROR
                }
            };
        }
    };

    logging::init_logging();

    let result = match cli.cmd {
        Commands::Cfg => handle_cfg_command(out, err),
        Commands::TienLen { cmd } => {
            load_config().and_then(|config| run_tien_len(cmd, &config, out, err))
        }
        Commands::XiDach { cmd } => {
            load_config().and_then(|config| run_xi_dach(cmd, &config, out, err))
        }
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(CliError::Interrupted(msg)) => {
            let _ = writeln!(err, "Cancelled: {}", msg);
            exit_code::INTERRUPTED
        }
        Err(e) => {
            let _ = ui::write_error(err, &e.to_string());
            exit_code::ERROR
        }
    }
}

fn write_usage(err: &mut dyn Write, e: &clap::Error, commands: &[&str]) -> std::io::Result<()> {
    writeln!(err, "{}", e)?;
    writeln!(err)?;
    writeln!(err, "diemso score ledger")?;
    writeln!(err, "Usage: diemso <command> [options]\n")?;
    writeln!(err, "Commands:")?;
    for c in commands {
        writeln!(err, "  {}", c)?;
    }
    writeln!(err, "\nFor full help, run: diemso --help")
}

fn load_config() -> Result<Config, CliError> {
    config::load().map_err(|e| CliError::Config(e.to_string()))
}

fn run_tien_len(
    cmd: TienLenCommand,
    config: &Config,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let mut store = JsonFileStore::new(&config.data_dir);
    match cmd {
        TienLenCommand::Session(cmd) => {
            run_session(Game::TienLen, cmd, config, &mut store, out, err)
        }
        TienLenCommand::Rank { players } => handle_rank_command(&players, &mut store, out, err),
        TienLenCommand::Pig {
            winner,
            loser,
            kind,
        } => handle_pig_command(&winner, &loser, kind, &mut store, out, err),
        TienLenCommand::Rules {
            first,
            second,
            third,
            last,
            pig_black,
            pig_red,
        } => {
            let overrides = RuleOverrides {
                first,
                second,
                third,
                last,
                pig_black,
                pig_red,
            };
            handle_rules_command(overrides, &mut store, out, err)
        }
    }
}

fn run_xi_dach(
    cmd: XiDachCommand,
    config: &Config,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let mut store = JsonFileStore::new(&config.data_dir);
    match cmd {
        XiDachCommand::Session(cmd) => {
            run_session(Game::XiDach, cmd, config, &mut store, out, err)
        }
        XiDachCommand::Round {
            dealer_tier,
            sets,
            dealer_takes_all,
            draw_all,
            copy_bet,
        } => {
            let request = RoundRequest {
                dealer_tier,
                sets,
                dealer_takes_all,
                draw_all,
                copy_bet,
            };
            handle_round_command(&request, config.starting_bet, &mut store, out, err)
        }
        XiDachCommand::Dealer { player } => handle_dealer_command(&player, &mut store, out, err),
    }
}

fn run_session(
    game: Game,
    cmd: SessionCommand,
    config: &Config,
    store: &mut JsonFileStore,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    match cmd {
        SessionCommand::New {
            players,
            dealer,
            force,
        } => handle_new_command(
            game,
            &players,
            dealer.as_deref(),
            force,
            config,
            store,
            out,
            err,
        ),
        SessionCommand::AddPlayer { name } => {
            handle_add_player_command(game, &name, store, out, err)
        }
        SessionCommand::RemovePlayer { player } => {
            handle_remove_player_command(game, &player, store, out, err)
        }
        SessionCommand::Show { last } => handle_show_command(game, last, &*store, out, err),
        SessionCommand::Summary => handle_summary_command(game, &*store, out, err),
        SessionCommand::Undo => handle_undo_command(game, store, out, err),
        SessionCommand::Reset { yes } => {
            let stdin = std::io::stdin();
            let mut stdin_lock = stdin.lock();
            handle_reset_command(game, yes, store, out, err, &mut stdin_lock)
        }
        SessionCommand::Verify => handle_verify_command(game, &*store, out, err),
        SessionCommand::Export { format, output } => {
            handle_export_command(game, format, &output, &*store, out, err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_types_cover_every_command() {
        let commands = vec![
            vec!["diemso", "cfg"],
            vec!["diemso", "tienlen", "new", "--player", "A", "--player", "B"],
            vec!["diemso", "tienlen", "add-player", "C"],
            vec!["diemso", "tienlen", "remove-player", "C"],
            vec!["diemso", "tienlen", "rank", "A", "B"],
            vec!["diemso", "tienlen", "pig", "--winner", "A", "--loser", "B", "--kind", "red"],
            vec!["diemso", "tienlen", "rules", "--first", "6"],
            vec!["diemso", "tienlen", "summary"],
            vec!["diemso", "tienlen", "verify"],
            vec!["diemso", "xidach", "round", "--set", "A=20:win", "--copy-bet"],
            vec!["diemso", "xidach", "dealer", "B"],
            vec!["diemso", "xidach", "show", "--last", "3"],
        ];
        for cmd_args in commands {
            let result = DiemsoCli::try_parse_from(&cmd_args);
            assert!(result.is_ok(), "Failed to parse: {:?}", cmd_args);
        }
    }

    #[test]
    fn test_unknown_command_prints_usage() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(["diemso", "baccarat"], &mut out, &mut err);
        assert_eq!(code, exit_code::ERROR);
        let stderr = String::from_utf8(err).unwrap();
        assert!(stderr.contains("Usage: diemso"));
        assert!(stderr.contains("xidach"));
    }
}
