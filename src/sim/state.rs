//! Game state and core simulation types
//!
//! Everything the spawner, simulator, input handler and session controller
//! read or write lives in one `GameState`, so every callback sees the latest
//! values.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::timers::{RemovalQueue, RepeatingTask};
use crate::consts::*;
use crate::highscores::HighScores;
use crate::tuning::GameConfig;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the start action
    Start,
    /// Active gameplay
    Playing,
    /// Session ended, waiting for restart
    GameOver,
}

/// Falling object kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Tap it for points; letting it land is a miss
    Target,
    /// Tapping it is a mistake; letting it land is fine
    Decoy,
}

/// Cosmetic wobble. Never affects gameplay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wobble {
    pub phase: f32,
    /// Radians per tick
    pub speed: f32,
    /// Peak rotation in degrees
    pub amplitude: f32,
}

impl Wobble {
    pub fn advance(&mut self) {
        self.phase = (self.phase + self.speed) % std::f32::consts::TAU;
    }

    /// Current rotation in degrees
    pub fn rotation(&self) -> f32 {
        self.phase.sin() * self.amplitude
    }
}

/// A falling object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingObject {
    pub id: u32,
    pub kind: ObjectKind,
    /// Centre position, y grows downward
    pub pos: Vec2,
    /// Pixels per tick
    pub velocity: f32,
    /// Diameter in pixels
    pub size: f32,
    pub wobble: Wobble,
    /// Palette index picked at spawn, for the view layer
    pub glyph: u8,
    pub tapped: bool,
}

impl FallingObject {
    /// Lowest point of the object
    pub fn leading_edge(&self) -> f32 {
        self.pos.y + self.size / 2.0
    }
}

/// Play-area dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayArea {
    pub width: f32,
    pub height: f32,
}

impl Default for PlayArea {
    fn default() -> Self {
        Self {
            width: DEFAULT_PLAY_WIDTH,
            height: DEFAULT_PLAY_HEIGHT,
        }
    }
}

impl PlayArea {
    /// Build from raw dimensions, clamping degenerate values to a workable minimum
    pub fn clamped(width: f32, height: f32) -> Self {
        let clamp = |v: f32, min: f32| if v.is_finite() { v.max(min) } else { min };
        Self {
            width: clamp(width, MIN_PLAY_WIDTH),
            height: clamp(height, MIN_PLAY_HEIGHT),
        }
    }

    /// y coordinate of the boundary line
    pub fn boundary_y(&self, boundary_fraction: f32) -> f32 {
        self.height * (1.0 - boundary_fraction)
    }
}

/// Kinds of transient feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Object hit the boundary line
    Splash(ObjectKind),
    /// Correct tap
    Catch,
    /// Wrong tap
    Blunder,
}

/// A transient visual effect, keyed by the object that spawned it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Effect {
    pub origin: u32,
    pub kind: EffectKind,
    pub pos: Vec2,
    pub size: f32,
    /// 1 when spawned, fades toward 0
    pub life: f32,
}

/// Gameplay events, drained by the shell each frame (audio, logging)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started { session: u32 },
    Spawned { id: u32, kind: ObjectKind },
    Caught { id: u32, score: u64 },
    Blunder { id: u32 },
    Splashed { id: u32, kind: ObjectKind },
    LifeLost { remaining: u8 },
    GameOver { score: u64, new_high: bool },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Balance for the active variant
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub score: u64,
    /// Remaining lives, `None` in sudden-death mode
    pub lives: Option<u8>,
    /// Monotonic within a session
    pub difficulty: f32,
    /// Consecutive correct taps
    pub streak: u32,
    /// Ticks since the session began
    pub time_ticks: u64,
    pub area: PlayArea,
    /// Live objects (sorted by id)
    pub objects: Vec<FallingObject>,
    pub effects: Vec<Effect>,
    /// In-memory leaderboard for this process
    pub high_scores: HighScores,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    pub spawn_task: RepeatingTask,
    pub frame_task: RepeatingTask,
    pub(crate) removals: RemovalQueue,
    pub(crate) rng: Pcg32,
    /// Sessions started so far
    pub sessions: u32,
    /// Whether the last finished session beat the previous best
    pub new_high: bool,
    /// Leaderboard place the last finished session took, if any
    pub rank: Option<usize>,
    /// Ticks remaining before autoplay may tap again
    pub(crate) autoplay_cooldown: u32,
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed and balance
    pub fn new(seed: u64, config: GameConfig) -> Self {
        Self {
            lives: config.failure.starting_lives(),
            config,
            seed,
            phase: GamePhase::Start,
            score: 0,
            difficulty: 0.0,
            streak: 0,
            time_ticks: 0,
            area: PlayArea::default(),
            objects: Vec::new(),
            effects: Vec::new(),
            high_scores: HighScores::new(),
            events: Vec::new(),
            spawn_task: RepeatingTask::default(),
            frame_task: RepeatingTask::default(),
            removals: RemovalQueue::default(),
            rng: Pcg32::seed_from_u64(seed),
            sessions: 0,
            new_high: false,
            rank: None,
            autoplay_cooldown: 0,
            next_id: 1,
        }
    }

    /// Allocate a new object ID. Never reset, so ids stay unique across restarts.
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Best score observed at any game over so far
    pub fn high_score(&self) -> u64 {
        self.high_scores.best()
    }

    /// Seconds since the session began
    pub fn elapsed_secs(&self) -> f32 {
        self.time_ticks as f32 * SIM_DT
    }

    pub fn object(&self, id: u32) -> Option<&FallingObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Apply a resize notification
    pub fn resize(&mut self, width: f32, height: f32) {
        let area = PlayArea::clamped(width, height);
        if area.width != width || area.height != height {
            log::warn!(
                "Degenerate play area {}x{} clamped to {}x{}",
                width,
                height,
                area.width,
                area.height
            );
        }
        self.area = area;
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Remove an object by id. Removing an unknown id is a no-op.
    pub fn remove_object(&mut self, id: u32) {
        self.objects.retain(|o| o.id != id);
    }

    /// Remove the effect spawned by `origin`. Removing an unknown id is a no-op.
    pub fn remove_effect(&mut self, origin: u32) {
        self.effects.retain(|e| e.origin != origin);
    }

    /// Add a transient effect and schedule its removal
    pub(crate) fn push_effect(&mut self, object: &FallingObject, kind: EffectKind) {
        self.effects.push(Effect {
            origin: object.id,
            kind,
            pos: object.pos,
            size: object.size,
            life: 1.0,
        });
        let due = self.time_ticks + ms_to_ticks(self.config.effect_ms);
        self.removals
            .schedule(super::timers::Removal::Effect(object.id), due);
    }

    /// Ensure objects are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.objects.sort_by_key(|o| o.id);
    }
}

/// Convert a delay to whole ticks, rounding up
pub fn ms_to_ticks(ms: f32) -> u64 {
    (ms.max(0.0) / TICK_MS - 1e-4).ceil().max(0.0) as u64
}
