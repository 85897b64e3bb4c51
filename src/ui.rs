//! Render snapshot for the view layer
//!
//! The shell never reads `GameState` directly; it renders a `RenderView`
//! built once per frame.

use serde::Serialize;

use crate::sim::{EffectKind, GamePhase, GameState, ObjectKind};

/// Glyphs for tap-for-points objects
pub const TARGET_GLYPHS: [&str; 4] = ["🍓", "⭐", "🍩", "💎"];
/// Glyphs for everything else
pub const DECOY_GLYPHS: [&str; 4] = ["💣", "🌵", "🧨", "🦂"];

/// End-of-session labels, highest threshold first
const GRADES: [(u64, &str); 4] = [
    (50, "Legendary"),
    (30, "Sharp Eyes"),
    (15, "Quick Hands"),
    (5, "Warming Up"),
];

/// Qualitative label for a final score
pub fn grade_for_score(score: u64) -> &'static str {
    GRADES
        .iter()
        .find(|&&(min, _)| score >= min)
        .map_or("Keep practicing!", |&(_, label)| label)
}

pub fn glyph(kind: ObjectKind, index: u8) -> &'static str {
    let set = match kind {
        ObjectKind::Target => &TARGET_GLYPHS,
        ObjectKind::Decoy => &DECOY_GLYPHS,
    };
    set[usize::from(index) % set.len()]
}

#[derive(Debug, Clone, Serialize)]
pub struct HudView {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: Option<u8>,
    pub max_lives: Option<u8>,
    /// 1-based level shown to the player
    pub level: u32,
    pub high_score: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ObjectView {
    pub id: u32,
    pub kind: ObjectKind,
    pub glyph: &'static str,
    /// Top-left corner, ready for absolute positioning
    pub left: f32,
    pub top: f32,
    pub size: f32,
    /// Degrees
    pub rotation: f32,
    pub tapped: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EffectView {
    pub origin: u32,
    pub kind: EffectKind,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryView {
    pub final_score: u64,
    pub high_score: u64,
    pub new_high: bool,
    /// 1-based leaderboard place, `None` when the run did not qualify
    pub rank: Option<usize>,
    pub grade: &'static str,
}

/// Everything the view layer draws for one frame
#[derive(Debug, Clone, Serialize)]
pub struct RenderView {
    pub hud: HudView,
    /// Boundary line y in pixels
    pub boundary_y: f32,
    pub objects: Vec<ObjectView>,
    pub effects: Vec<EffectView>,
    /// Present only on the game over screen
    pub summary: Option<SummaryView>,
}

impl RenderView {
    pub fn from_state(state: &GameState) -> Self {
        let hud = HudView {
            phase: state.phase,
            score: state.score,
            lives: state.lives,
            max_lives: state.config.failure.starting_lives(),
            level: state.difficulty.floor() as u32 + 1,
            high_score: state.high_score(),
        };

        let objects = state
            .objects
            .iter()
            .map(|o| ObjectView {
                id: o.id,
                kind: o.kind,
                glyph: glyph(o.kind, o.glyph),
                left: o.pos.x - o.size / 2.0,
                top: o.pos.y - o.size / 2.0,
                size: o.size,
                rotation: o.wobble.rotation(),
                tapped: o.tapped,
            })
            .collect();

        let effects = state
            .effects
            .iter()
            .map(|e| EffectView {
                origin: e.origin,
                kind: e.kind,
                x: e.pos.x,
                y: e.pos.y,
                size: e.size,
                opacity: e.life,
            })
            .collect();

        let summary = (state.phase == GamePhase::GameOver).then(|| SummaryView {
            final_score: state.score,
            high_score: state.high_score(),
            new_high: state.new_high,
            rank: state.rank,
            grade: grade_for_score(state.score),
        });

        Self {
            hud,
            boundary_y: state.area.boundary_y(state.config.boundary_fraction),
            objects,
            effects,
            summary,
        }
    }
}
