use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::EngineError;

/// Minimum roster size for a session to start.
pub const MIN_PLAYERS: usize = 2;

/// Opaque, stable player identifier.
///
/// Identifiers never change for the life of a session; names may be shown to
/// the user but all score bookkeeping is keyed by id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random identifier for a newly seated player.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A seated player with a running score.
///
/// The score only moves through [`crate::ledger::apply`] and
/// [`crate::ledger::undo_last`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    name: String,
    score: i64,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            score: 0,
        }
    }

    /// Player restored from an externally supplied score snapshot.
    pub fn with_score(id: impl Into<PlayerId>, name: impl Into<String>, score: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            score,
        }
    }

    pub fn id(&self) -> &PlayerId {
        &self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn score(&self) -> i64 {
        self.score
    }

    pub(crate) fn adjust(&mut self, delta: i64) {
        self.score += delta;
    }

    pub(crate) fn retract(&mut self, delta: i64) {
        self.score -= delta;
    }

    pub(crate) fn clear_score(&mut self) {
        self.score = 0;
    }
}

/// Looks a player up by exact id first, then by case-insensitive name.
pub fn find_player<'a>(players: &'a [Player], key: &str) -> Option<&'a Player> {
    let key = key.trim();
    players
        .iter()
        .find(|p| p.id.as_str() == key)
        .or_else(|| players.iter().find(|p| p.name.eq_ignore_ascii_case(key)))
}

/// Resolves a lookup key to a player id or reports it as unknown.
pub fn resolve_player(players: &[Player], key: &str) -> Result<PlayerId, EngineError> {
    find_player(players, key)
        .map(|p| p.id.clone())
        .ok_or_else(|| EngineError::UnknownPlayer(key.trim().to_string()))
}

pub fn contains_player(players: &[Player], id: &PlayerId) -> bool {
    players.iter().any(|p| &p.id == id)
}

/// Checks that `name` can be seated next to `players` and returns it trimmed.
pub fn validate_name(players: &[Player], name: &str) -> Result<String, EngineError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(EngineError::EmptyName);
    }
    if players.iter().any(|p| p.name.eq_ignore_ascii_case(name)) {
        return Err(EngineError::DuplicateName(name.to_string()));
    }
    Ok(name.to_string())
}

/// Builds a fresh roster (all scores 0) from a list of names.
pub fn seat_players<I, S>(names: I) -> Result<Vec<Player>, EngineError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut players: Vec<Player> = Vec::new();
    for name in names {
        let name = validate_name(&players, name.as_ref())?;
        players.push(Player::new(PlayerId::generate(), name));
    }
    if players.len() < MIN_PLAYERS {
        return Err(EngineError::NotEnoughPlayers {
            minimum: MIN_PLAYERS,
            actual: players.len(),
        });
    }
    Ok(players)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<Player> {
        vec![Player::new("a", "An"), Player::new("b", "Binh")]
    }

    #[test]
    fn find_by_id_then_name() {
        let players = roster();
        assert_eq!(find_player(&players, "a").map(|p| p.name()), Some("An"));
        assert_eq!(
            find_player(&players, "binh").map(|p| p.id().as_str()),
            Some("b")
        );
        assert!(find_player(&players, "Chi").is_none());
    }

    #[test]
    fn validate_name_rejects_blank_and_duplicates() {
        let players = roster();
        assert_eq!(validate_name(&players, "   "), Err(EngineError::EmptyName));
        assert_eq!(
            validate_name(&players, "AN"),
            Err(EngineError::DuplicateName("AN".to_string()))
        );
        assert_eq!(validate_name(&players, " Chi "), Ok("Chi".to_string()));
    }

    #[test]
    fn seat_players_requires_two() {
        let err = seat_players(["Solo"]).unwrap_err();
        assert_eq!(
            err,
            EngineError::NotEnoughPlayers {
                minimum: 2,
                actual: 1
            }
        );
        let players = seat_players(["An", "Binh", "Chi"]).unwrap();
        assert_eq!(players.len(), 3);
        assert!(players.iter().all(|p| p.score() == 0));
        assert_ne!(players[0].id(), players[1].id());
    }
}
