//! Round-start configuration loaded from `assets/skirmish.toml`.
//!
//! [`GameConfig`] is a Bevy [`Resource`] that mirrors the tunable subset of
//! [`crate::constants`].  Every field is optional in the file: the loader
//! drops any entry that is missing, non-numeric, or non-positive and lets the
//! compiled default stand in for it, so a hand-edited file with one typo still
//! applies every other value.
//!
//! ## Tuning workflow
//!
//! 1. Edit `assets/skirmish.toml` (only the keys you care about).
//! 2. Restart the round; no recompilation required.
//!
//! `world_size` is accepted as shorthand for a square world and only fills
//! `world_width` / `world_height` when those are not given explicitly.

use crate::constants::*;
use crate::error::{SimError, SimResult};
use bevy::log::{debug, info, warn};
use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

/// Default location of the config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "assets/skirmish.toml";

/// Keys holding whole counts; fractional values are truncated.
const INTEGER_KEYS: [&str; 8] = [
    "min_asteroids",
    "max_asteroids",
    "min_planets",
    "max_planets",
    "min_enemies",
    "max_enemies",
    "max_asteroid_population",
    "lives",
];

/// Runtime-tunable gameplay configuration, fixed for the duration of a round.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── World ─────────────────────────────────────────────────────────────────
    pub world_width: f32,
    pub world_height: f32,
    pub round_time: f32,

    // ── Craft ─────────────────────────────────────────────────────────────────
    pub craft_radius: f32,
    pub craft_mass: f32,
    pub lives: u32,
    pub max_speed: f32,

    // ── Populations ───────────────────────────────────────────────────────────
    pub min_asteroids: u32,
    pub max_asteroids: u32,
    pub max_asteroid_population: u32,
    pub min_planets: u32,
    pub max_planets: u32,
    pub min_enemies: u32,
    pub max_enemies: u32,

    // ── Gravity ───────────────────────────────────────────────────────────────
    pub gravity_const: f32,
    pub gravity_multiplier: f32,
    pub planet_gravity_multiplier: f32,
    pub gravity_range_factor: f32,
    pub gravity_warning_ratio: f32,

    // ── Weapons & pickups ─────────────────────────────────────────────────────
    pub projectile_lifetime: f32,
    pub projectile_mass: f32,
    pub shield_duration: f32,
    pub weapon_boost_duration: f32,

    // ── Asteroids & enemies ───────────────────────────────────────────────────
    pub min_split_radius: f32,
    pub enemy_max_speed: f32,
    pub enemy_detection_radius: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_width: WORLD_SIZE,
            world_height: WORLD_SIZE,
            round_time: ROUND_TIME,
            craft_radius: DEFAULT_CRAFT_RADIUS,
            craft_mass: DEFAULT_CRAFT_MASS,
            lives: CRAFT_LIVES,
            max_speed: MAX_SPEED,
            min_asteroids: MIN_INITIAL_ASTEROIDS,
            max_asteroids: MAX_INITIAL_ASTEROIDS,
            max_asteroid_population: MAX_ASTEROIDS as u32,
            min_planets: MAX_PLANETS,
            max_planets: MAX_PLANETS,
            min_enemies: MIN_ENEMIES,
            max_enemies: MAX_ENEMIES,
            gravity_const: GRAVITY_CONST,
            gravity_multiplier: GRAVITY_MULT,
            planet_gravity_multiplier: PLANET_GRAVITY_MULT,
            gravity_range_factor: GRAVITY_RANGE_FACTOR,
            gravity_warning_ratio: GRAVITY_WARNING_RATIO,
            projectile_lifetime: PROJECTILE_LIFETIME,
            projectile_mass: PROJECTILE_MASS,
            shield_duration: SHIELD_DURATION,
            weapon_boost_duration: WEAPON_BOOST_DURATION,
            min_split_radius: MIN_SPLIT_RADIUS,
            enemy_max_speed: ENEMY_MAX_SPEED,
            enemy_detection_radius: ENEMY_DETECTION_RADIUS,
        }
    }
}

impl GameConfig {
    /// Parse a TOML document, silently replacing unusable entries with defaults.
    ///
    /// Only a syntactically broken document is an error; individual bad
    /// values are dropped one by one.
    pub fn from_toml_str(contents: &str) -> SimResult<Self> {
        let table = contents
            .parse::<toml::Table>()
            .map_err(|e| SimError::ConfigParse {
                message: e.to_string(),
            })?;

        let mut cleaned = toml::Table::new();
        for (key, value) in table {
            match sanitize_entry(&key, &value) {
                Some(v) => {
                    cleaned.insert(key, v);
                }
                None => debug!("config: ignoring `{key}` = {value}; using default"),
            }
        }

        if let Some(size) = cleaned.remove("world_size") {
            for axis in ["world_width", "world_height"] {
                if !cleaned.contains_key(axis) {
                    cleaned.insert(axis.to_string(), size.clone());
                }
            }
        }

        let mut config = toml::Value::Table(cleaned)
            .try_into::<GameConfig>()
            .map_err(|e| SimError::ConfigParse {
                message: e.to_string(),
            })?;
        config.normalize_ranges();
        Ok(config)
    }

    /// Read and parse a config file.
    pub fn read(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| SimError::ConfigIo {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Mass of an asteroid of the given radius.
    #[inline]
    pub fn asteroid_mass(&self, radius: f32) -> f32 {
        radius * self.gravity_multiplier
    }

    /// Mass of a planet of the given radius.
    #[inline]
    pub fn planet_mass(&self, radius: f32) -> f32 {
        radius * self.gravity_multiplier * self.planet_gravity_multiplier
    }

    /// Distance beyond which a body of `mass` exerts no gravity.
    #[inline]
    pub fn influence_radius(&self, mass: f32) -> f32 {
        mass * self.gravity_range_factor
    }

    /// Swap inverted `[min, max]` pairs so uniform draws never see an empty range.
    fn normalize_ranges(&mut self) {
        for (min, max) in [
            (&mut self.min_asteroids, &mut self.max_asteroids),
            (&mut self.min_planets, &mut self.max_planets),
            (&mut self.min_enemies, &mut self.max_enemies),
        ] {
            if *min > *max {
                std::mem::swap(min, max);
            }
        }
    }
}

/// Keep positive finite numbers, coercing them to the type the field expects.
fn sanitize_entry(key: &str, value: &toml::Value) -> Option<toml::Value> {
    let number = match value {
        toml::Value::Integer(i) => *i as f64,
        toml::Value::Float(f) => *f,
        _ => return None,
    };
    if !number.is_finite() || number <= 0.0 {
        return None;
    }
    if INTEGER_KEYS.contains(&key) {
        let whole = number.trunc();
        (whole >= 1.0 && whole <= u32::MAX as f64).then(|| toml::Value::Integer(whole as i64))
    } else {
        Some(toml::Value::Float(number))
    }
}

/// Load the config at `path`, falling back to compiled defaults on any failure.
///
/// A missing file is expected (defaults are the normal case) and only logged
/// at info; a file that exists but cannot be parsed logs a warning.
pub fn load_game_config(path: impl AsRef<Path>) -> GameConfig {
    let path = path.as_ref();
    if !path.exists() {
        info!("No {} found; using compiled defaults", path.display());
        return GameConfig::default();
    }
    match GameConfig::read(path) {
        Ok(config) => {
            info!("Loaded game config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("{e}; using defaults");
            GameConfig::default()
        }
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = GameConfig::from_toml_str("").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = GameConfig::from_toml_str("round_time = 90\nmax_speed = 3.5").unwrap();
        assert_eq!(config.round_time, 90.0);
        assert_eq!(config.max_speed, 3.5);
        assert_eq!(config.craft_radius, DEFAULT_CRAFT_RADIUS);
    }

    #[test]
    fn non_numeric_and_non_positive_entries_fall_back_individually() {
        let config = GameConfig::from_toml_str(
            "craft_radius = \"big\"\ncraft_mass = 0\nshield_duration = -4\nmin_enemies = 2",
        )
        .unwrap();
        assert_eq!(config.craft_radius, DEFAULT_CRAFT_RADIUS);
        assert_eq!(config.craft_mass, DEFAULT_CRAFT_MASS);
        assert_eq!(config.shield_duration, SHIELD_DURATION);
        assert_eq!(config.min_enemies, 2);
    }

    #[test]
    fn fractional_counts_are_truncated() {
        let config = GameConfig::from_toml_str("max_enemies = 7.9").unwrap();
        assert_eq!(config.max_enemies, 7);
    }

    #[test]
    fn world_size_shorthand_fills_both_axes() {
        let config = GameConfig::from_toml_str("world_size = 1200").unwrap();
        assert_eq!(config.world_width, 1200.0);
        assert_eq!(config.world_height, 1200.0);

        let config = GameConfig::from_toml_str("world_size = 1200\nworld_height = 800").unwrap();
        assert_eq!(config.world_width, 1200.0);
        assert_eq!(config.world_height, 800.0);
    }

    #[test]
    fn inverted_ranges_are_swapped() {
        let config = GameConfig::from_toml_str("min_asteroids = 40\nmax_asteroids = 12").unwrap();
        assert_eq!(config.min_asteroids, 12);
        assert_eq!(config.max_asteroids, 40);
    }

    #[test]
    fn broken_syntax_is_an_error() {
        assert!(GameConfig::from_toml_str("round_time = = 3").is_err());
    }

    #[test]
    fn missing_file_loads_defaults() {
        let config = load_game_config("definitely/not/here.toml");
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn influence_radius_scales_with_mass() {
        let config = GameConfig::default();
        assert_eq!(config.influence_radius(2.0), 2.0 * GRAVITY_RANGE_FACTOR);
        assert_eq!(config.planet_mass(50.0), 50.0 * GRAVITY_MULT * PLANET_GRAVITY_MULT);
    }
}
