//! Object spawner
//!
//! Creates one falling object per firing of the spawn task and re-arms the
//! task with an interval that shrinks as difficulty rises.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{FallingObject, GameEvent, GamePhase, GameState, ObjectKind, Wobble};
use crate::consts::GLYPHS_PER_KIND;
use crate::tuning::SpawnTuning;

/// Uniform sample in `[lo, hi]`, collapsing to `lo` for empty ranges
fn uniform(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..=hi) } else { lo }
}

/// Probability that the next object is a `Target`
pub fn target_chance(spawn: &SpawnTuning, difficulty: f32) -> f32 {
    (spawn.target_chance_base + difficulty * spawn.target_chance_step)
        .min(spawn.target_chance_max)
        .clamp(0.0, 1.0)
}

/// Fall speed range (px/tick) at the given difficulty
pub fn speed_range(spawn: &SpawnTuning, difficulty: f32) -> (f32, f32) {
    let shift = difficulty * spawn.speed_step;
    (
        (spawn.speed_min + shift).min(spawn.speed_cap),
        (spawn.speed_max + shift).min(spawn.speed_cap),
    )
}

/// Interval before the next spawn, before jitter
pub fn base_interval_ms(spawn: &SpawnTuning, difficulty: f32) -> f32 {
    (spawn.base_interval_ms - difficulty * spawn.decay_ms_per_level).max(spawn.min_interval_ms)
}

/// Interval before the next spawn, with ±jitter applied
pub fn spawn_interval_ms(spawn: &SpawnTuning, difficulty: f32, rng: &mut Pcg32) -> f32 {
    let jitter = uniform(rng, 1.0 - spawn.jitter, 1.0 + spawn.jitter);
    base_interval_ms(spawn, difficulty) * jitter
}

/// Create one object just above the visible area. Returns its id.
pub fn spawn_object(state: &mut GameState) -> u32 {
    let spawn = state.config.spawn.clone();
    let wobble_tuning = state.config.wobble;
    let difficulty = state.difficulty;
    let width = state.area.width;
    let id = state.next_entity_id();
    let rng = &mut state.rng;

    let kind = if rng.random_bool(f64::from(target_chance(&spawn, difficulty))) {
        ObjectKind::Target
    } else {
        ObjectKind::Decoy
    };

    let (speed_lo, speed_hi) = speed_range(&spawn, difficulty);
    let velocity = uniform(rng, speed_lo, speed_hi);

    let (size_lo, size_hi) = match kind {
        ObjectKind::Target => spawn.target_size,
        ObjectKind::Decoy => spawn.decoy_size,
    };
    // Never wider than the play area, so the inset below always fits
    let size = uniform(rng, size_lo, size_hi).min(width);

    // Inset by half the size so the object never spawns clipped
    let half = size / 2.0;
    let x = uniform(rng, half, width - half);

    let wobble = Wobble {
        phase: uniform(rng, 0.0, std::f32::consts::TAU),
        speed: uniform(rng, wobble_tuning.speed.0, wobble_tuning.speed.1),
        amplitude: uniform(
            rng,
            wobble_tuning.amplitude_deg.0,
            wobble_tuning.amplitude_deg.1,
        ),
    };
    let glyph = rng.random_range(0..GLYPHS_PER_KIND);

    state.objects.push(FallingObject {
        id,
        kind,
        pos: Vec2::new(x, -half),
        velocity,
        size,
        wobble,
        glyph,
        tapped: false,
    });
    state.events.push(GameEvent::Spawned { id, kind });
    log::trace!("Spawned {:?} #{} at x={:.0} v={:.2}", kind, id, x, velocity);
    id
}

/// Advance the spawn task; spawns and re-arms when it fires
pub fn run_spawner(state: &mut GameState, elapsed_ms: f32) {
    if state.phase != GamePhase::Playing {
        state.spawn_task.cancel();
        return;
    }
    if !state.spawn_task.advance(elapsed_ms) {
        return;
    }

    spawn_object(state);

    if state.phase == GamePhase::Playing {
        let delay = spawn_interval_ms(&state.config.spawn, state.difficulty, &mut state.rng);
        state.spawn_task.schedule(delay);
    }
}
