//! Data-driven game balance
//!
//! Grid geometry is fixed (see `consts`); everything a designer would want to
//! tweak lives here. Defaults reproduce the arcade feel; hosts may load
//! overrides from JSON, where missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::consts::CELL;

#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Points awarded per event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreTable {
    pub mushroom: u64,
    pub head: u64,
    pub body: u64,
    pub spider: u64,
    pub level_clear: u64,
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self {
            mushroom: 1,
            head: 10,
            body: 5,
            spider: 100,
            level_clear: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Horizontal speed (px/s)
    pub player_speed: f32,
    /// Minimum time between shots (ms)
    pub fire_delay_ms: f32,
    /// Upward bullet speed (px/s)
    pub bullet_speed: f32,
    pub starting_lives: i32,

    // === Field ===
    pub mushroom_density: f64,
    /// Added per level past the first
    pub mushroom_density_per_level: f64,

    // === Centipede ===
    /// Length before the level bonus (`+ min(10, 2 * level)`)
    pub centipede_base_length: u32,
    /// Cells/sec before the level bonus (`+ min(6, level)`)
    pub centipede_base_speed: f32,

    // === Spider ===
    /// Chance per tick that an absent spider appears
    pub spider_spawn_chance: f64,
    pub spider_lifetime_ms: f32,
    /// Per-axis speed range (px/s)
    pub spider_speed_min: f32,
    pub spider_speed_max: f32,
    pub spider_radius: f32,
    /// Extra reach added to the radius when checking the player
    pub spider_player_margin: f32,

    pub score: ScoreTable,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: 180.0,
            fire_delay_ms: 140.0,
            bullet_speed: 420.0,
            starting_lives: 3,

            mushroom_density: 0.06,
            mushroom_density_per_level: 0.01,

            centipede_base_length: 10,
            centipede_base_speed: 7.0,

            spider_spawn_chance: 0.003,
            spider_lifetime_ms: 12_000.0,
            spider_speed_min: 60.0,
            spider_speed_max: 100.0,
            spider_radius: CELL * 0.9,
            spider_player_margin: 10.0,

            score: ScoreTable::default(),
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON override
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> TuningError {
            TuningError::Invalid { field, reason }
        }

        if self.player_speed <= 0.0 {
            return Err(invalid("player_speed", "must be positive"));
        }
        if self.fire_delay_ms <= 0.0 {
            return Err(invalid("fire_delay_ms", "must be positive"));
        }
        if self.bullet_speed <= 0.0 {
            return Err(invalid("bullet_speed", "must be positive"));
        }
        if self.starting_lives < 1 {
            return Err(invalid("starting_lives", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.mushroom_density) {
            return Err(invalid("mushroom_density", "must be within [0, 1]"));
        }
        if self.mushroom_density_per_level < 0.0 {
            return Err(invalid("mushroom_density_per_level", "must not be negative"));
        }
        if self.centipede_base_length == 0 {
            return Err(invalid("centipede_base_length", "must be positive"));
        }
        if self.centipede_base_speed <= 0.0 {
            return Err(invalid("centipede_base_speed", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.spider_spawn_chance) {
            return Err(invalid("spider_spawn_chance", "must be within [0, 1]"));
        }
        if self.spider_lifetime_ms <= 0.0 {
            return Err(invalid("spider_lifetime_ms", "must be positive"));
        }
        if self.spider_speed_min <= 0.0 || self.spider_speed_max < self.spider_speed_min {
            return Err(invalid("spider_speed_min", "speed range must be positive and ordered"));
        }
        if self.spider_radius <= 0.0 {
            return Err(invalid("spider_radius", "must be positive"));
        }
        Ok(())
    }
}
