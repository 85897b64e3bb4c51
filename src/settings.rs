//! Game settings and preferences
//!
//! Read once at startup (inline JSON in the page, or `--config` natively).
//! Nothing here is written back anywhere.

use serde::{Deserialize, Serialize};

use crate::tuning::{ConfigError, GameConfig};

/// Game variant presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Three lives, speed climbs with score
    #[default]
    Classic,
    /// One mistake and it's over, speed climbs with the streak
    SuddenDeath,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "Classic",
            Variant::SuddenDeath => "Sudden Death",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "lives" => Some(Variant::Classic),
            "sudden-death" | "sudden_death" | "suddendeath" | "sudden" => {
                Some(Variant::SuddenDeath)
            }
            _ => None,
        }
    }

    /// Balance preset for this variant
    pub fn game_config(&self) -> GameConfig {
        match self {
            Variant::Classic => GameConfig::lives(),
            Variant::SuddenDeath => GameConfig::sudden_death(),
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub variant: Variant,

    // === Audio ===
    pub sound: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    /// Full balance override; replaces the variant preset when present
    pub tuning: Option<GameConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variant: Variant::Classic,
            sound: true,
            master_volume: 0.8,
            show_fps: false,
            tuning: None,
        }
    }
}

impl Settings {
    /// Create settings for a variant
    pub fn from_variant(variant: Variant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings, falling back to defaults on any error
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(settings) => {
                log::info!("Loaded settings ({})", settings.variant.as_str());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.master_volume) {
            return Err(ConfigError::Invalid {
                field: "master_volume",
                reason: format!("{} is outside 0..1", self.master_volume),
            });
        }
        if let Some(tuning) = &self.tuning {
            tuning.validate()?;
        }
        Ok(())
    }

    /// Balance the engine should run with
    pub fn game_config(&self) -> GameConfig {
        self.tuning
            .clone()
            .unwrap_or_else(|| self.variant.game_config())
    }

    /// Effective SFX volume (0 when sound is off)
    pub fn effective_volume(&self) -> f32 {
        if self.sound { self.master_volume } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::FailureMode;

    #[test]
    fn test_variant_names() {
        assert_eq!(Variant::from_str("Classic"), Some(Variant::Classic));
        assert_eq!(Variant::from_str("sudden-death"), Some(Variant::SuddenDeath));
        assert_eq!(Variant::from_str("arcade"), None);
        assert_eq!(Variant::SuddenDeath.as_str(), "Sudden Death");
    }

    #[test]
    fn test_variant_selects_failure_mode() {
        let settings = Settings::from_variant(Variant::SuddenDeath);
        assert_eq!(settings.game_config().failure, FailureMode::SuddenDeath);
        let settings = Settings::default();
        assert_eq!(
            settings.game_config().failure,
            FailureMode::Lives { starting: 3 }
        );
    }

    #[test]
    fn test_json_partial_and_override() {
        let settings = Settings::from_json(r#"{ "variant": "sudden_death", "sound": false }"#)
            .unwrap();
        assert_eq!(settings.variant, Variant::SuddenDeath);
        assert_eq!(settings.effective_volume(), 0.0);

        let json = r#"{
            "tuning": {
                "failure": { "mode": "lives", "starting": 1 },
                "difficulty": { "curve": "streak", "step": 0.5 }
            }
        }"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(
            settings.game_config().failure,
            FailureMode::Lives { starting: 1 }
        );
    }

    #[test]
    fn test_bad_json_falls_back() {
        let settings = Settings::from_json_or_default(r#"{ "master_volume": 4.0 }"#);
        assert_eq!(settings, Settings::default());
        let settings = Settings::from_json_or_default("nope");
        assert_eq!(settings, Settings::default());
    }
}
