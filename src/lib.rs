//! Tap Rush - tap-the-falling-emoji reaction games and a quick math quiz
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawner, falling objects, taps, session phases)
//! - `tuning`: Data-driven game balance for both variants
//! - `settings`: Player-facing presets and config loading
//! - `highscores`: In-memory leaderboard
//! - `ui`: Render snapshot consumed by the view layer
//! - `quiz`: Multiple-choice quiz session
//! - `platform`: Browser/native platform abstraction

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod highscores;
pub mod platform;
pub mod quiz;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use highscores::HighScores;
pub use settings::{Settings, Variant};
pub use tuning::{ConfigError, GameConfig};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Milliseconds per tick
    pub const TICK_MS: f32 = 1000.0 / 60.0;
    /// Frame rate object velocities are expressed against
    pub const REFERENCE_FPS: f32 = 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Play area before the first resize notification
    pub const DEFAULT_PLAY_WIDTH: f32 = 400.0;
    pub const DEFAULT_PLAY_HEIGHT: f32 = 600.0;
    /// Smallest workable play area
    pub const MIN_PLAY_WIDTH: f32 = 120.0;
    pub const MIN_PLAY_HEIGHT: f32 = 160.0;

    /// Glyph variations per object kind
    pub const GLYPHS_PER_KIND: u8 = 4;

    /// Autoplay taps targets whose centre passed this fraction of the height
    pub const AUTOPLAY_REACH: f32 = 0.4;
    /// Ticks between autoplay taps
    pub const AUTOPLAY_COOLDOWN_TICKS: u32 = 12;
}
