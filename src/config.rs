//! Runtime configuration.
//!
//! Compiled defaults come from [`crate::constants`]; any field can be overridden
//! with a `PACMAN_`-prefixed environment variable (`PACMAN_STARTING_LIVES=5`).

use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::constants::{delays, MAX_LEVELS, PACMAN_SPEED, STARTING_LIVES, TICK_TIME};
use crate::error::GameResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Length of one gameplay tick, in milliseconds.
    pub tick_ms: u64,
    /// Pac-Man's speed, in pixels per second. Ghost speeds derive from it.
    pub pacman_speed: f32,
    pub starting_lives: u8,
    /// Seed for scared-mode wandering.
    pub rng_seed: u64,
    /// Completing this level ends the game.
    pub max_levels: u8,
    /// Name attached to score submissions.
    pub player_name: String,
    pub submit_timeout_ms: u64,
    /// How long an eaten ghost waits at home before it is let out again.
    pub consumed_respawn_ms: u64,
    /// Upper bound on ticks for the headless driver.
    pub max_ticks: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_ms: TICK_TIME.as_millis() as u64,
            pacman_speed: PACMAN_SPEED,
            starting_lives: STARTING_LIVES,
            rng_seed: 0x00C0_FFEE,
            max_levels: MAX_LEVELS,
            player_name: "PLAYER".to_string(),
            submit_timeout_ms: delays::SCORE_SUBMIT_TIMEOUT_MS,
            consumed_respawn_ms: delays::CONSUMED_RESPAWN_MS,
            max_ticks: 60 * 60 * 10,
        }
    }
}

impl GameConfig {
    /// Defaults layered under `PACMAN_*` environment variables.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(GameConfig::default())).merge(Env::prefixed("PACMAN_"))
    }

    /// Loads the configuration from the environment.
    pub fn load() -> GameResult<GameConfig> {
        Ok(Self::figment().extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = GameConfig::default();
        assert_eq!(config.tick_ms, 16);
        assert_eq!(config.starting_lives, 3);
        assert_eq!(config.max_levels, 5);
        assert_eq!(config.consumed_respawn_ms, 3000);
        assert_eq!(config.pacman_speed, 170.0);
    }

    #[test]
    fn test_overrides_layer_over_defaults() {
        let config: GameConfig = Figment::from(Serialized::defaults(GameConfig::default()))
            .merge(Serialized::default("starting_lives", 5))
            .merge(Serialized::default("player_name", "INKY"))
            .extract()
            .unwrap();

        assert_eq!(config.starting_lives, 5);
        assert_eq!(config.player_name, "INKY");
        assert_eq!(config.tick_ms, 16);
    }

    #[test]
    fn test_bad_override_is_an_error() {
        let result: Result<GameConfig, _> = Figment::from(Serialized::defaults(GameConfig::default()))
            .merge(Serialized::default("starting_lives", "plenty"))
            .extract();
        assert!(result.is_err());
    }
}
