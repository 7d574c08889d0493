//! Command-line argument definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "diemso",
    version,
    about = "Score ledger for Tiến Lên and Xì Dách card games"
)]
pub struct DiemsoCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Tiến Lên: finishing-order points and pig penalties
    #[command(name = "tienlen")]
    TienLen {
        #[command(subcommand)]
        cmd: TienLenCommand,
    },
    /// Xì Dách: dealer-vs-players betting rounds
    #[command(name = "xidach")]
    XiDach {
        #[command(subcommand)]
        cmd: XiDachCommand,
    },
    /// Show the resolved configuration and where each value came from
    Cfg,
}

/// Commands shared by both games.
#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Start a new session with the given players
    New {
        #[arg(long = "player", required = true, num_args = 1..)]
        players: Vec<String>,
        /// Initial dealer (Xì Dách only; defaults to the first player)
        #[arg(long)]
        dealer: Option<String>,
        /// Replace an existing session that already has recorded rounds
        #[arg(long)]
        force: bool,
    },
    /// Seat another player (only before the first round)
    AddPlayer { name: String },
    /// Remove a player (only before the first round)
    RemovePlayer { player: String },
    /// Scoreboard and recent history
    Show {
        /// Number of history entries to list
        #[arg(long, default_value_t = 10)]
        last: usize,
    },
    /// Winners and losers
    Summary,
    /// Reverse the most recent round
    Undo,
    /// Zero every score and clear the history
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Check that scores match the recorded history
    Verify,
    /// Write the session history to a file
    Export {
        #[arg(long, value_enum)]
        format: ExportFormat,
        #[arg(long)]
        output: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum TienLenCommand {
    #[command(flatten)]
    Session(SessionCommand),
    /// Record a finishing order, best first
    Rank {
        #[arg(required = true, num_args = 2..)]
        players: Vec<String>,
    },
    /// Record a pig penalty
    Pig {
        #[arg(long)]
        winner: String,
        #[arg(long)]
        loser: String,
        #[arg(long, value_enum)]
        kind: PigKind,
    },
    /// Show or change rank points
    Rules {
        #[arg(long, allow_negative_numbers = true)]
        first: Option<i64>,
        #[arg(long, allow_negative_numbers = true)]
        second: Option<i64>,
        #[arg(long, allow_negative_numbers = true)]
        third: Option<i64>,
        #[arg(long, allow_negative_numbers = true)]
        last: Option<i64>,
        #[arg(long)]
        pig_black: Option<i64>,
        #[arg(long)]
        pig_red: Option<i64>,
    },
}

#[derive(Subcommand, Debug)]
pub enum XiDachCommand {
    #[command(flatten)]
    Session(SessionCommand),
    /// Settle one round against the dealer
    Round {
        /// Dealer hand tier: 1 normal, 2 Xì Dách, 3 Xì Bàn
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=3))]
        dealer_tier: u8,
        /// NAME[=BET][:win|lose|draw][:x2|x3]
        #[arg(long = "set")]
        sets: Vec<String>,
        /// Every player loses to the dealer
        #[arg(long, conflicts_with = "draw_all")]
        dealer_takes_all: bool,
        /// Every player draws
        #[arg(long)]
        draw_all: bool,
        /// Copy the first player's bet to everyone
        #[arg(long)]
        copy_bet: bool,
    },
    /// Hand the dealer role to another player
    Dealer { player: String },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PigKind {
    Black,
    Red,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    Sqlite,
}

impl ExportFormat {
    /// # Examples
    ///
    /// ```
    /// # use diemso_cli::cli::ExportFormat;
    /// assert_eq!(ExportFormat::Sqlite.as_str(), "sqlite");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Sqlite => "sqlite",
        }
    }
}
