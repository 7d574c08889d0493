use thiserror::Error;

use crate::player::PlayerId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("Ranking needs at least 2 finishers, got {actual}")]
    RankingTooShort { actual: usize },
    #[error("Ranking lists {actual} finishers but only {players} players are seated")]
    RankingTooLong { actual: usize, players: usize },
    #[error("Player {0} appears more than once in the ranking")]
    DuplicateFinisher(PlayerId),
    #[error("Unknown player: {0}")]
    UnknownPlayer(String),
    #[error("Penalty winner and loser must differ")]
    SelfPenalty,
    #[error("No dealer selected")]
    NoDealer,
    #[error("No active players besides the dealer")]
    NoActivePlayers,
    #[error("Bet for {player} must not be negative (got {amount})")]
    NegativeBet { player: PlayerId, amount: i64 },
    #[error("Bet for {player} must not exceed {max} (got {amount})")]
    BetTooLarge {
        player: PlayerId,
        amount: i64,
        max: i64,
    },
    #[error("Score for {0} would leave the representable range")]
    ScoreOverflow(PlayerId),
    #[error("A round is already being collected")]
    RoundInProgress,
    #[error("No round is being collected")]
    NoRoundInProgress,
    #[error("Players cannot be added or removed once rounds have been recorded")]
    RosterLocked,
    #[error("Player name must not be empty")]
    EmptyName,
    #[error("A player named {0} already exists")]
    DuplicateName(String),
    #[error("At least {minimum} players are required, got {actual}")]
    NotEnoughPlayers { minimum: usize, actual: usize },
    #[error("Invalid rank points: {0}")]
    InvalidRankPoints(String),
    #[error("Operation requires a {expected} session")]
    WrongGame { expected: &'static str },
}
