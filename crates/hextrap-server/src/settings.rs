//! Server settings read from the environment.

use anyhow::Context;
use hextrap_core::GameConfig;
use std::net::SocketAddr;
use std::path::Path;

const DEFAULT_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub struct Settings {
    pub addr: SocketAddr,
    /// Config handed to every new session
    pub game: GameConfig,
}

impl Settings {
    /// `SERVER_ADDR` picks the listen address; `HEXTRAP_CONFIG` optionally
    /// names a TOML file with the game config.
    pub fn from_env() -> anyhow::Result<Self> {
        let addr: SocketAddr = std::env::var("SERVER_ADDR")
            .unwrap_or_else(|_| DEFAULT_ADDR.into())
            .parse()
            .context("SERVER_ADDR is not a socket address")?;

        let game = match std::env::var("HEXTRAP_CONFIG") {
            Ok(path) => load_game_config(Path::new(&path))?,
            Err(_) => GameConfig::default(),
        };

        Ok(Self { addr, game })
    }
}

/// Load and validate a game config from a TOML file
pub fn load_game_config(path: &Path) -> anyhow::Result<GameConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_game_config(&content).with_context(|| format!("invalid config in {}", path.display()))
}

/// Parse a TOML game config; missing keys take their defaults
pub fn parse_game_config(content: &str) -> anyhow::Result<GameConfig> {
    let config: GameConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}
