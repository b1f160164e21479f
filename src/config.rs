//! Runtime game configuration loaded from `assets/game.toml`.
//!
//! [`GameConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_game_config`] reads
//! `assets/game.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the values you care about.
//!
//! ## Usage in systems
//!
//! Add `config: Res<GameConfig>` to any system parameter list and read values
//! with `config.game_duration_ms`, `config.decoy_count`, etc.

use crate::constants::*;
use crate::error::ConfigError;
use bevy::prelude::*;
use serde::Deserialize;

/// Runtime-tunable gameplay, account and storage configuration.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Find Game ─────────────────────────────────────────────────────────────
    pub game_duration_ms: f64,
    pub decoy_count: usize,
    pub trainer_pool_size: usize,
    pub pokemon_pool_size: usize,
    pub sprite_size: f32,
    pub safe_margin: f32,
    pub launch_height_fraction: f32,
    pub flight_duration_secs: f32,
    pub image_load_timeout_secs: f64,

    // ── Quiz ──────────────────────────────────────────────────────────────────
    pub quiz_duration_secs: u32,
    pub quiz_questions_per_round: usize,
    pub quiz_login_bonus: u32,

    // ── Accounts ──────────────────────────────────────────────────────────────
    pub max_login_attempts: u32,
    pub lockout_secs: u64,

    // ── Storage & Assets ──────────────────────────────────────────────────────
    pub data_dir: String,
    pub trainer_image_dir: String,
    pub pokemon_image_dir: String,
    pub pokeball_image: String,

    // ── Leaderboard ───────────────────────────────────────────────────────────
    pub leaderboard_page_size: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            // Find Game
            game_duration_ms: GAME_DURATION_MS,
            decoy_count: DECOY_COUNT,
            trainer_pool_size: NUM_TRAINERS,
            pokemon_pool_size: NUM_POKEMONS,
            sprite_size: SPRITE_SIZE,
            safe_margin: SAFE_MARGIN,
            launch_height_fraction: LAUNCH_HEIGHT_FRACTION,
            flight_duration_secs: FLIGHT_DURATION_SECS,
            image_load_timeout_secs: IMAGE_LOAD_TIMEOUT_SECS,
            // Quiz
            quiz_duration_secs: QUIZ_DURATION_SECS,
            quiz_questions_per_round: QUIZ_QUESTIONS_PER_ROUND,
            quiz_login_bonus: QUIZ_LOGIN_BONUS,
            // Accounts
            max_login_attempts: MAX_LOGIN_ATTEMPTS,
            lockout_secs: LOCKOUT_SECS,
            // Storage & Assets
            data_dir: DATA_DIR.to_string(),
            trainer_image_dir: TRAINER_IMAGE_DIR.to_string(),
            pokemon_image_dir: POKEMON_IMAGE_DIR.to_string(),
            pokeball_image: POKEBALL_IMAGE.to_string(),
            // Leaderboard
            leaderboard_page_size: LEADERBOARD_PAGE_SIZE,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) TOML document on top of the defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<GameConfig>(contents)
    }

    /// Reject values that would break the round loop or the layout maths.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game_duration_ms <= 0.0 {
            return Err(ConfigError {
                name: "game_duration_ms",
                value: self.game_duration_ms,
                safe_range: "(0, ∞)",
            });
        }
        if self.decoy_count == 0 {
            return Err(ConfigError {
                name: "decoy_count",
                value: 0.0,
                safe_range: "[1, ∞)",
            });
        }
        if self.trainer_pool_size == 0 {
            return Err(ConfigError {
                name: "trainer_pool_size",
                value: 0.0,
                safe_range: "[1, ∞)",
            });
        }
        if self.pokemon_pool_size == 0 {
            return Err(ConfigError {
                name: "pokemon_pool_size",
                value: 0.0,
                safe_range: "[1, ∞)",
            });
        }
        if self.sprite_size <= 0.0 {
            return Err(ConfigError {
                name: "sprite_size",
                value: self.sprite_size as f64,
                safe_range: "(0, ∞)",
            });
        }
        if self.safe_margin < 0.0 {
            return Err(ConfigError {
                name: "safe_margin",
                value: self.safe_margin as f64,
                safe_range: "[0, ∞)",
            });
        }
        if !(0.0..=1.0).contains(&self.launch_height_fraction) {
            return Err(ConfigError {
                name: "launch_height_fraction",
                value: self.launch_height_fraction as f64,
                safe_range: "[0, 1]",
            });
        }
        if self.flight_duration_secs <= 0.0 {
            return Err(ConfigError {
                name: "flight_duration_secs",
                value: self.flight_duration_secs as f64,
                safe_range: "(0, ∞)",
            });
        }
        if self.image_load_timeout_secs <= 0.0 {
            return Err(ConfigError {
                name: "image_load_timeout_secs",
                value: self.image_load_timeout_secs,
                safe_range: "(0, ∞)",
            });
        }
        if self.quiz_questions_per_round == 0 {
            return Err(ConfigError {
                name: "quiz_questions_per_round",
                value: 0.0,
                safe_range: "[1, ∞)",
            });
        }
        Ok(())
    }
}

/// Startup system: attempt to load `assets/game.toml` and overwrite the
/// `GameConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults.  Parse errors and unsafe
/// values are logged and the defaults stay in place.  A missing file is not an
/// error.
pub fn load_game_config(mut config: ResMut<GameConfig>) {
    let path = "assets/game.toml";
    match std::fs::read_to_string(path) {
        Ok(contents) => match GameConfig::from_toml_str(&contents) {
            Ok(loaded) => match loaded.validate() {
                Ok(()) => {
                    *config = loaded;
                    info!("Loaded game config from {path}");
                }
                Err(e) => warn!("Rejected {path}: {e}; using defaults"),
            },
            Err(e) => warn!("Failed to parse {path}: {e}; using defaults"),
        },
        Err(_) => info!("No {path} found; using compiled defaults"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mirror_constants() {
        let config = GameConfig::default();
        assert_eq!(config.game_duration_ms, GAME_DURATION_MS);
        assert_eq!(config.decoy_count, DECOY_COUNT);
        assert_eq!(config.sprite_size, SPRITE_SIZE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = GameConfig::from_toml_str("decoy_count = 20\nsafe_margin = 10.0\n")
            .expect("partial config must parse");
        assert_eq!(config.decoy_count, 20);
        assert_eq!(config.safe_margin, 10.0);
        assert_eq!(config.game_duration_ms, GAME_DURATION_MS);
        assert_eq!(config.data_dir, DATA_DIR);
    }

    #[test]
    fn zero_decoys_is_rejected() {
        let config = GameConfig {
            decoy_count: 0,
            ..Default::default()
        };
        let err = config.validate().expect_err("zero decoys must be rejected");
        assert_eq!(err.name, "decoy_count");
    }

    #[test]
    fn launch_fraction_outside_unit_range_is_rejected() {
        let config = GameConfig {
            launch_height_fraction: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
