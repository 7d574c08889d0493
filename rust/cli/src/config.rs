use diemso_engine::bet::{DEFAULT_STARTING_BET, MAX_BET};
use diemso_engine::rank::RankPoints;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const CONFIG_ENV: &str = "DIEMSO_CONFIG";
pub const DATA_DIR_ENV: &str = "DIEMSO_DATA_DIR";
pub const STARTING_BET_ENV: &str = "DIEMSO_STARTING_BET";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub starting_bet: i64,
    pub rank_points: RankPoints,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub data_dir: ValueSource,
    pub starting_bet: ValueSource,
    pub rank_points: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            data_dir: ValueSource::Default,
            starting_bet: ValueSource::Default,
            rank_points: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".diemso"),
            starting_bet: DEFAULT_STARTING_BET,
            rank_points: RankPoints::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var(CONFIG_ENV)
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.data_dir {
            cfg.data_dir = v;
            sources.data_dir = ValueSource::File;
        }
        if let Some(v) = f.starting_bet {
            cfg.starting_bet = v;
            sources.starting_bet = ValueSource::File;
        }
        if let Some(points) = f.rank_points {
            if points.overlay(&mut cfg.rank_points) {
                sources.rank_points = ValueSource::File;
            }
        }
    }

    if let Ok(dir) = std::env::var(DATA_DIR_ENV)
        && !dir.is_empty()
    {
        cfg.data_dir = PathBuf::from(dir);
        sources.data_dir = ValueSource::Env;
    }
    if let Ok(bet) = std::env::var(STARTING_BET_ENV)
        && !bet.is_empty()
    {
        cfg.starting_bet = bet
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid starting bet: {}", bet)))?;
        sources.starting_bet = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    data_dir: Option<PathBuf>,
    #[serde(default)]
    starting_bet: Option<i64>,
    #[serde(default)]
    rank_points: Option<FileRankPoints>,
}

/// `[rank_points]` table; any subset of keys may be given.
#[derive(Debug, Default, Deserialize)]
struct FileRankPoints {
    first: Option<i64>,
    second: Option<i64>,
    third: Option<i64>,
    last: Option<i64>,
    pig_black: Option<i64>,
    pig_red: Option<i64>,
}

impl FileRankPoints {
    /// Writes the given keys over `points`; true when any key was set.
    fn overlay(&self, points: &mut RankPoints) -> bool {
        let mut touched = false;
        for (value, slot) in [
            (self.first, &mut points.first),
            (self.second, &mut points.second),
            (self.third, &mut points.third),
            (self.last, &mut points.last),
            (self.pig_black, &mut points.pig_black),
            (self.pig_red, &mut points.pig_red),
        ] {
            if let Some(v) = value {
                *slot = v;
                touched = true;
            }
        }
        touched
    }
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.starting_bet <= 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: starting_bet must be >0".into(),
        ));
    }
    if cfg.starting_bet > MAX_BET {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: starting_bet must not exceed {}",
            MAX_BET
        )));
    }
    if cfg.data_dir.as_os_str().is_empty() {
        return Err(ConfigError::Invalid(
            "Invalid configuration: data_dir must not be empty".into(),
        ));
    }
    cfg.rank_points
        .validate()
        .map_err(|e| ConfigError::Invalid(format!("Invalid configuration: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_rank_table_overlays_defaults() {
        let f: FileConfig = toml::from_str(
            r#"
            starting_bet = 20
            [rank_points]
            first = 6
            last = -6
            "#,
        )
        .unwrap();
        let mut points = RankPoints::default();
        assert!(f.rank_points.unwrap().overlay(&mut points));
        assert_eq!(points.first, 6);
        assert_eq!(points.second, 3);
        assert_eq!(points.last, -6);
        assert_eq!(f.starting_bet, Some(20));
    }

    #[test]
    fn zero_starting_bet_is_invalid() {
        let cfg = Config {
            starting_bet: 0,
            ..Config::default()
        };
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn starting_bet_above_the_limit_is_invalid() {
        let cfg = Config {
            starting_bet: MAX_BET + 1,
            ..Config::default()
        };
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn inverted_rank_points_are_invalid() {
        let cfg = Config {
            rank_points: RankPoints {
                first: -5,
                last: 5,
                ..RankPoints::default()
            },
            ..Config::default()
        };
        assert!(validate(&cfg).is_err());
    }
}
