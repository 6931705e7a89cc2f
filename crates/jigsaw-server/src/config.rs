//! Server configuration read from the environment.

use anyhow::Context;
use jigsaw_core::PuzzleConfig;
use std::net::SocketAddr;
use std::str::FromStr;

const DEFAULT_ADDR: &str = "0.0.0.0:8080";

/// Runtime settings for the server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (`SERVER_ADDR`)
    pub addr: SocketAddr,
    /// Layout used when a client starts a puzzle without overrides
    pub puzzle: PuzzleConfig,
}

impl ServerConfig {
    /// Read `SERVER_ADDR`, `PUZZLE_PIECE_SIZE`, `PUZZLE_PLAY_WIDTH` and
    /// `PUZZLE_PLAY_HEIGHT`, falling back to defaults for anything unset.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr: SocketAddr = parse_or(&lookup, "SERVER_ADDR", DEFAULT_ADDR.parse()?)?;

        let mut puzzle = PuzzleConfig::default();
        puzzle.piece_size = parse_or(&lookup, "PUZZLE_PIECE_SIZE", puzzle.piece_size)?;
        puzzle.play_area.width = parse_or(&lookup, "PUZZLE_PLAY_WIDTH", puzzle.play_area.width)?;
        puzzle.play_area.height = parse_or(&lookup, "PUZZLE_PLAY_HEIGHT", puzzle.play_area.height)?;
        puzzle
            .validate()
            .context("Puzzle settings from the environment are unusable")?;

        Ok(Self { addr, puzzle })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.puzzle, PuzzleConfig::default());
    }

    #[test]
    fn test_overrides_from_environment() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("SERVER_ADDR", "127.0.0.1:9000"),
            ("PUZZLE_PIECE_SIZE", "40"),
            ("PUZZLE_PLAY_WIDTH", "1600"),
        ]))
        .unwrap();
        assert_eq!(config.addr.port(), 9000);
        assert_eq!(config.puzzle.piece_size, 40.0);
        assert_eq!(config.puzzle.play_area.width, 1600.0);
        assert_eq!(config.puzzle.play_area.height, 800.0);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(ServerConfig::from_lookup(lookup(&[("PUZZLE_PIECE_SIZE", "big")])).is_err());
        // Parses, but the board no longer fits the play area
        assert!(ServerConfig::from_lookup(lookup(&[("PUZZLE_PLAY_WIDTH", "100")])).is_err());
    }
}
