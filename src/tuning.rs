//! Data-driven game balance
//!
//! One simulation engine serves both reaction-game variants; everything that
//! differs between them (failure policy, difficulty curve, spawn cadence) is
//! expressed here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MIN_PLAY_WIDTH;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// What happens when the player misses a target or taps a decoy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FailureMode {
    /// Finite mistake budget; the session ends when it runs out
    Lives { starting: u8 },
    /// First qualifying mistake ends the session
    SuddenDeath,
}

impl FailureMode {
    pub fn starting_lives(&self) -> Option<u8> {
        match self {
            FailureMode::Lives { starting } => Some(*starting),
            FailureMode::SuddenDeath => None,
        }
    }
}

/// How the difficulty scalar is derived from session progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "curve", rename_all = "snake_case")]
pub enum DifficultyCurve {
    /// One level per `points_per_level` points scored
    ScoreLevel { points_per_level: u32 },
    /// `step` per consecutive correct tap
    Streak { step: f32 },
    /// One level per `seconds_per_level` seconds survived
    Elapsed { seconds_per_level: f32 },
}

impl DifficultyCurve {
    /// Raw curve value. Callers keep the running max so difficulty never drops.
    pub fn level(&self, score: u64, streak: u32, elapsed_secs: f32) -> f32 {
        match *self {
            DifficultyCurve::ScoreLevel { points_per_level } => {
                (score / u64::from(points_per_level.max(1))) as f32
            }
            DifficultyCurve::Streak { step } => streak as f32 * step,
            DifficultyCurve::Elapsed { seconds_per_level } => {
                (elapsed_secs / seconds_per_level.max(f32::EPSILON)).floor()
            }
        }
    }
}

/// Spawner cadence and object attribute ranges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Delay before the first object of a session
    pub first_spawn_ms: f32,
    pub base_interval_ms: f32,
    pub min_interval_ms: f32,
    /// Interval shrink per difficulty level
    pub decay_ms_per_level: f32,
    /// Multiplicative ± jitter applied to every interval (0.3 = ±30%)
    pub jitter: f32,

    pub target_chance_base: f32,
    pub target_chance_step: f32,
    pub target_chance_max: f32,

    /// Fall speed in pixels per reference frame (60 Hz)
    pub speed_min: f32,
    pub speed_max: f32,
    pub speed_step: f32,
    pub speed_cap: f32,

    /// Diameter ranges (px)
    pub target_size: (f32, f32),
    pub decoy_size: (f32, f32),
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            first_spawn_ms: 400.0,
            base_interval_ms: 1100.0,
            min_interval_ms: 320.0,
            decay_ms_per_level: 90.0,
            jitter: 0.3,

            target_chance_base: 0.55,
            target_chance_step: 0.03,
            target_chance_max: 0.8,

            speed_min: 1.6,
            speed_max: 2.8,
            speed_step: 0.35,
            speed_cap: 9.0,

            target_size: (44.0, 60.0),
            decoy_size: (40.0, 56.0),
        }
    }
}

/// Wobble/rotation ranges (cosmetic only)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WobbleTuning {
    /// Peak rotation in degrees
    pub amplitude_deg: (f32, f32),
    /// Phase advance in radians per tick
    pub speed: (f32, f32),
}

impl Default for WobbleTuning {
    fn default() -> Self {
        Self {
            amplitude_deg: (6.0, 18.0),
            speed: (0.04, 0.12),
        }
    }
}

/// Complete balance for one game variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub failure: FailureMode,
    pub difficulty: DifficultyCurve,
    #[serde(default)]
    pub spawn: SpawnTuning,
    #[serde(default)]
    pub wobble: WobbleTuning,
    /// Boundary line height, as a fraction of the play area from the bottom
    #[serde(default = "default_boundary_fraction")]
    pub boundary_fraction: f32,
    /// How long a tapped object lingers before removal
    #[serde(default = "default_tap_removal_ms")]
    pub tap_removal_ms: f32,
    /// Lifetime of splash/tap feedback effects
    #[serde(default = "default_effect_ms")]
    pub effect_ms: f32,
}

fn default_boundary_fraction() -> f32 {
    0.12
}

fn default_tap_removal_ms() -> f32 {
    350.0
}

fn default_effect_ms() -> f32 {
    600.0
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::lives()
    }
}

impl GameConfig {
    /// Variant A: three lives, difficulty climbs with score
    pub fn lives() -> Self {
        Self {
            failure: FailureMode::Lives { starting: 3 },
            difficulty: DifficultyCurve::ScoreLevel {
                points_per_level: 5,
            },
            spawn: SpawnTuning::default(),
            wobble: WobbleTuning::default(),
            boundary_fraction: default_boundary_fraction(),
            tap_removal_ms: default_tap_removal_ms(),
            effect_ms: default_effect_ms(),
        }
    }

    /// Variant B: one mistake ends the run, difficulty climbs with the streak
    pub fn sudden_death() -> Self {
        Self {
            failure: FailureMode::SuddenDeath,
            difficulty: DifficultyCurve::Streak { step: 0.25 },
            spawn: SpawnTuning {
                base_interval_ms: 950.0,
                target_chance_base: 0.6,
                target_chance_step: 0.02,
                target_chance_max: 0.75,
                ..SpawnTuning::default()
            },
            ..Self::lives()
        }
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.failure {
            FailureMode::Lives { starting: 0 } => {
                return Err(ConfigError::invalid("failure.starting", "must be at least 1"));
            }
            FailureMode::Lives { .. } | FailureMode::SuddenDeath => {}
        }

        match self.difficulty {
            DifficultyCurve::ScoreLevel { points_per_level: 0 } => {
                return Err(ConfigError::invalid(
                    "difficulty.points_per_level",
                    "must be at least 1",
                ));
            }
            DifficultyCurve::Streak { step } if !(step.is_finite() && step >= 0.0) => {
                return Err(ConfigError::invalid(
                    "difficulty.step",
                    format!("{step} is not a non-negative number"),
                ));
            }
            DifficultyCurve::Elapsed { seconds_per_level }
                if !(seconds_per_level.is_finite() && seconds_per_level > 0.0) =>
            {
                return Err(ConfigError::invalid(
                    "difficulty.seconds_per_level",
                    format!("{seconds_per_level} must be positive"),
                ));
            }
            _ => {}
        }

        let s = &self.spawn;
        positive("spawn.min_interval_ms", s.min_interval_ms)?;
        non_negative("spawn.first_spawn_ms", s.first_spawn_ms)?;
        non_negative("spawn.decay_ms_per_level", s.decay_ms_per_level)?;
        if s.base_interval_ms < s.min_interval_ms {
            return Err(ConfigError::invalid(
                "spawn.base_interval_ms",
                "must not be below min_interval_ms",
            ));
        }
        if !(0.0..1.0).contains(&s.jitter) {
            return Err(ConfigError::invalid("spawn.jitter", "must be in [0, 1)"));
        }
        probability("spawn.target_chance_base", s.target_chance_base)?;
        probability("spawn.target_chance_max", s.target_chance_max)?;
        non_negative("spawn.target_chance_step", s.target_chance_step)?;
        positive("spawn.speed_min", s.speed_min)?;
        non_negative("spawn.speed_step", s.speed_step)?;
        ordered("spawn.speed_max", s.speed_min, s.speed_max)?;
        ordered("spawn.speed_cap", s.speed_min, s.speed_cap)?;
        positive("spawn.target_size", s.target_size.0)?;
        ordered("spawn.target_size", s.target_size.0, s.target_size.1)?;
        positive("spawn.decoy_size", s.decoy_size.0)?;
        ordered("spawn.decoy_size", s.decoy_size.0, s.decoy_size.1)?;
        fits_play_area("spawn.target_size", s.target_size.1)?;
        fits_play_area("spawn.decoy_size", s.decoy_size.1)?;

        non_negative("wobble.amplitude_deg", self.wobble.amplitude_deg.0)?;
        ordered(
            "wobble.amplitude_deg",
            self.wobble.amplitude_deg.0,
            self.wobble.amplitude_deg.1,
        )?;
        non_negative("wobble.speed", self.wobble.speed.0)?;
        ordered("wobble.speed", self.wobble.speed.0, self.wobble.speed.1)?;

        if !(0.0..1.0).contains(&self.boundary_fraction) {
            return Err(ConfigError::invalid("boundary_fraction", "must be in [0, 1)"));
        }
        non_negative("tap_removal_ms", self.tap_removal_ms)?;
        non_negative("effect_ms", self.effect_ms)?;
        Ok(())
    }
}

/// Objects must fit the narrowest play area a resize can produce
fn fits_play_area(field: &'static str, size: f32) -> Result<(), ConfigError> {
    if size <= MIN_PLAY_WIDTH {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("{size} is wider than the {MIN_PLAY_WIDTH} px minimum play area"),
        ))
    }
}

fn positive(field: &'static str, v: f32) -> Result<(), ConfigError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{v} must be positive")))
    }
}

fn non_negative(field: &'static str, v: f32) -> Result<(), ConfigError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{v} must be >= 0")))
    }
}

fn probability(field: &'static str, v: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{v} is not a probability")))
    }
}

fn ordered(field: &'static str, lo: f32, hi: f32) -> Result<(), ConfigError> {
    if hi.is_finite() && hi >= lo {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("upper bound {hi} below {lo}")))
    }
}
