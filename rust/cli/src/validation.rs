//! Parsing for the compact per-player round syntax used by `xidach round`.
//!
//! A seat spec reads `NAME[=BET][:MOD]...` where each modifier is a result
//! (`win`, `lose`, `draw`) or a hand tier (`x1`, `x2`, `x3`).

use diemso_engine::bet::{Outcome, Tier, MAX_BET};

/// One `--set` argument after parsing. Player names are resolved later
/// against the session roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatSpec {
    pub player: String,
    pub bet: Option<i64>,
    pub outcome: Option<Outcome>,
    pub tier: Option<Tier>,
}

/// Parses a seat spec.
///
/// # Example
///
/// ```rust
/// # use diemso_cli::validation::parse_seat_spec;
/// use diemso_engine::bet::{Outcome, Tier, MAX_BET};
///
/// let spec = parse_seat_spec("An=20:win").unwrap();
/// assert_eq!(spec.player, "An");
/// assert_eq!(spec.bet, Some(20));
/// assert_eq!(spec.outcome, Some(Outcome::Win));
/// assert_eq!(spec.tier, None);
///
/// let spec = parse_seat_spec("Binh:x3").unwrap();
/// assert_eq!(spec.bet, None);
/// assert_eq!(spec.tier, Some(Tier::XiBan));
///
/// assert!(parse_seat_spec("An=-5").is_err());
/// ```
pub fn parse_seat_spec(input: &str) -> Result<SeatSpec, String> {
    let mut parts = input.split(':');
    let head = parts.next().unwrap_or_default().trim();
    let (player, bet) = match head.split_once('=') {
        Some((name, amount)) => (name.trim(), Some(parse_bet(amount)?)),
        None => (head, None),
    };
    if player.is_empty() {
        return Err(format!("Missing player name in '{}'", input));
    }

    let mut spec = SeatSpec {
        player: player.to_string(),
        bet,
        outcome: None,
        tier: None,
    };
    for modifier in parts {
        let m = modifier.trim().to_ascii_lowercase();
        if let Some(outcome) = parse_outcome(&m) {
            if spec.outcome.replace(outcome).is_some() {
                return Err(format!("Result given twice in '{}'", input));
            }
        } else if let Some(tier) = parse_tier(&m) {
            if spec.tier.replace(tier).is_some() {
                return Err(format!("Tier given twice in '{}'", input));
            }
        } else {
            return Err(format!(
                "Unrecognized modifier '{}' in '{}' (expected win, lose, draw, x1, x2 or x3)",
                modifier, input
            ));
        }
    }
    Ok(spec)
}

fn parse_bet(s: &str) -> Result<i64, String> {
    let s = s.trim();
    let amount: i64 = s
        .parse()
        .map_err(|_| format!("Invalid bet '{}': must be a whole number", s))?;
    if amount < 0 {
        return Err(format!("Invalid bet '{}': must not be negative", s));
    }
    if amount > MAX_BET {
        return Err(format!("Invalid bet '{}': must not exceed {}", s, MAX_BET));
    }
    Ok(amount)
}

pub fn parse_outcome(s: &str) -> Option<Outcome> {
    match s {
        "win" | "w" => Some(Outcome::Win),
        "lose" | "l" => Some(Outcome::Lose),
        "draw" | "d" => Some(Outcome::Draw),
        _ => None,
    }
}

/// Accepts `x1`..`x3` and the hand names.
pub fn parse_tier(s: &str) -> Option<Tier> {
    match s {
        "x1" | "normal" => Some(Tier::Normal),
        "x2" | "xidach" => Some(Tier::XiDach),
        "x3" | "xiban" => Some(Tier::XiBan),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_spec() {
        let spec = parse_seat_spec(" Chi = 15 : LOSE : x2 ").unwrap();
        assert_eq!(
            spec,
            SeatSpec {
                player: "Chi".into(),
                bet: Some(15),
                outcome: Some(Outcome::Lose),
                tier: Some(Tier::XiDach),
            }
        );
    }

    #[test]
    fn bare_name_is_valid() {
        let spec = parse_seat_spec("Dung").unwrap();
        assert_eq!(spec.player, "Dung");
        assert!(spec.bet.is_none() && spec.outcome.is_none() && spec.tier.is_none());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_seat_spec("=10").is_err());
        assert!(parse_seat_spec("An=ten").is_err());
        assert!(parse_seat_spec("An:win:lose").is_err());
        assert!(parse_seat_spec("An:x4").is_err());
    }

    #[test]
    fn bet_is_capped() {
        assert_eq!(parse_seat_spec("An=1000000000").unwrap().bet, Some(MAX_BET));
        let err = parse_seat_spec("An=4611686018427387904:x3").unwrap_err();
        assert!(err.contains("must not exceed"));
    }

    #[test]
    fn tier_names() {
        assert_eq!(parse_tier("xiban"), Some(Tier::XiBan));
        assert_eq!(parse_tier("x1"), Some(Tier::Normal));
        assert_eq!(parse_tier("x9"), None);
    }
}
