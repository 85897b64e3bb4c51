//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::session::Failure;
use super::spawn::run_spawner;
use super::state::{EffectKind, GameEvent, GamePhase, GameState, ObjectKind};
use super::tap::tap;
use super::timers::Removal;
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Object ids tapped since the last tick, in arrival order
    pub taps: Vec<u32>,
    /// Start button
    pub start: bool,
    /// Restart button on the game over screen
    pub restart: bool,
    /// New play-area dimensions
    pub resize: Option<(f32, f32)>,
    /// Idle/demo mode - AI taps targets
    pub autoplay: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if let Some((width, height)) = input.resize {
        state.resize(width, height);
    }
    if input.start {
        state.start();
    }
    if input.restart {
        state.restart();
    }
    for &id in &input.taps {
        tap(state, id);
    }

    // Both loops stop as soon as the session is no longer playing
    if state.phase != GamePhase::Playing {
        state.frame_task.cancel();
        state.spawn_task.cancel();
        return;
    }

    let dt_ms = dt * 1000.0;
    if !state.frame_task.advance(dt_ms) {
        return;
    }
    state.time_ticks += 1;

    if input.autoplay {
        autoplay(state);
    }

    process_removals(state);
    run_spawner(state, dt_ms);
    simulate(state, dt);

    if state.phase == GamePhase::Playing {
        state.refresh_difficulty();
        state.frame_task.schedule(0.0);
    }

    let fade = dt_ms / state.config.effect_ms.max(1.0);
    for effect in &mut state.effects {
        effect.life = (effect.life - fade).max(0.0);
    }

    // Ensure deterministic ordering
    state.normalize_order();
}

/// Advance untapped objects and reap the ones that reached the boundary line
fn simulate(state: &mut GameState, dt: f32) {
    let boundary = state.area.boundary_y(state.config.boundary_fraction);
    let frames = dt * REFERENCE_FPS;

    let objects = std::mem::take(&mut state.objects);
    let mut live = Vec::with_capacity(objects.len());
    let mut crossed = Vec::new();

    for mut obj in objects {
        // Tapped objects stay visible until their removal fires, but never move
        if obj.tapped {
            live.push(obj);
            continue;
        }
        obj.pos.y += obj.velocity * frames;
        obj.wobble.advance();
        if obj.leading_edge() >= boundary {
            crossed.push(obj);
        } else {
            live.push(obj);
        }
    }
    state.objects = live;

    for obj in crossed {
        state.push_effect(&obj, EffectKind::Splash(obj.kind));
        state.events.push(GameEvent::Splashed {
            id: obj.id,
            kind: obj.kind,
        });
        // Decoys landing are harmless in both modes
        if obj.kind == ObjectKind::Target {
            state.apply_failure(Failure::Missed);
        }
    }
}

/// Fire delayed one-shot removals that came due
fn process_removals(state: &mut GameState) {
    for removal in state.removals.drain_due(state.time_ticks) {
        match removal {
            Removal::Object(id) => state.remove_object(id),
            Removal::Effect(id) => state.remove_effect(id),
        }
    }
}

/// Demo player: taps the lowest target once it is far enough down
fn autoplay(state: &mut GameState) {
    if state.autoplay_cooldown > 0 {
        state.autoplay_cooldown -= 1;
        return;
    }
    let reach = state.area.height * AUTOPLAY_REACH;
    let pick = state
        .objects
        .iter()
        .filter(|o| !o.tapped && o.kind == ObjectKind::Target && o.pos.y >= reach)
        .max_by(|a, b| {
            a.pos
                .y
                .partial_cmp(&b.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|o| o.id);

    if let Some(id) = pick {
        tap(state, id);
        state.autoplay_cooldown = AUTOPLAY_COOLDOWN_TICKS;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{FallingObject, Wobble, ms_to_ticks};
    use crate::tuning::GameConfig;
    use glam::Vec2;
    use std::collections::HashMap;

    /// Playing state with the spawner pushed far into the future
    fn quiet_state(config: GameConfig) -> GameState {
        let mut config = config;
        config.spawn.first_spawn_ms = 1.0e9;
        let mut state = GameState::new(42, config);
        state.resize(400.0, 600.0);
        state.start();
        state
    }

    fn place(state: &mut GameState, kind: ObjectKind, y: f32, velocity: f32) -> u32 {
        let id = state.next_entity_id();
        state.objects.push(FallingObject {
            id,
            kind,
            pos: Vec2::new(200.0, y),
            velocity,
            size: 40.0,
            wobble: Wobble {
                phase: 0.0,
                speed: 0.1,
                amplitude: 10.0,
            },
            glyph: 0,
            tapped: false,
        });
        id
    }

    fn run(state: &mut GameState, ticks: usize) {
        let input = TickInput::default();
        for _ in 0..ticks {
            tick(state, &input, SIM_DT);
        }
    }

    #[test]
    fn test_start_via_input() {
        let mut state = GameState::new(1, GameConfig::lives());
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.time_ticks, 0);

        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_three_missed_targets_end_lives_session() {
        let mut state = quiet_state(GameConfig::lives());
        let boundary = state.area.boundary_y(state.config.boundary_fraction);
        // Leading edges 10, 60 and 110 px above the line, falling 5 px/tick
        for gap in [10.0, 60.0, 110.0] {
            place(&mut state, ObjectKind::Target, boundary - 20.0 - gap, 5.0);
        }

        run(&mut state, 2);
        assert_eq!(state.lives, Some(2));
        assert_eq!(state.phase, GamePhase::Playing);

        run(&mut state, 10);
        assert_eq!(state.lives, Some(1));
        assert_eq!(state.phase, GamePhase::Playing);

        run(&mut state, 10);
        assert_eq!(state.lives, Some(0));
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_decoy_landing_is_harmless() {
        let mut state = quiet_state(GameConfig::sudden_death());
        let boundary = state.area.boundary_y(state.config.boundary_fraction);
        let id = place(&mut state, ObjectKind::Decoy, boundary - 21.0, 5.0);

        run(&mut state, 1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.object(id).is_none());
        assert!(
            state
                .effects
                .iter()
                .any(|e| e.origin == id && e.kind == EffectKind::Splash(ObjectKind::Decoy))
        );
    }

    #[test]
    fn test_sudden_death_missed_target() {
        let mut state = quiet_state(GameConfig::sudden_death());
        let boundary = state.area.boundary_y(state.config.boundary_fraction);
        place(&mut state, ObjectKind::Target, boundary - 21.0, 5.0);

        run(&mut state, 1);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::GameOver {
                    score: 0,
                    new_high: false
                })
        );
    }

    #[test]
    fn test_sudden_death_decoy_tap_via_input() {
        let mut state = quiet_state(GameConfig::sudden_death());
        let target = place(&mut state, ObjectKind::Target, 100.0, 1.0);
        let decoy = place(&mut state, ObjectKind::Decoy, 100.0, 1.0);
        let input = TickInput {
            taps: vec![target],
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.score, 1);

        let input = TickInput {
            taps: vec![decoy],
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_frame_loop_halts_after_game_over() {
        let mut state = quiet_state(GameConfig::sudden_death());
        let id = place(&mut state, ObjectKind::Target, 100.0, 1.0);
        state.end_session();
        let ticks = state.time_ticks;
        let y = state.object(id).map(|o| o.pos.y);

        run(&mut state, 30);
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.object(id).map(|o| o.pos.y), y);
        assert!(!state.frame_task.is_scheduled());
        assert!(!state.spawn_task.is_scheduled());
    }

    #[test]
    fn test_tapped_object_freezes_then_disappears() {
        let mut state = quiet_state(GameConfig::lives());
        let id = place(&mut state, ObjectKind::Target, 100.0, 3.0);
        let input = TickInput {
            taps: vec![id],
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        let frozen_y = state.object(id).map(|o| o.pos.y);
        assert_eq!(frozen_y, Some(100.0));

        let removal_ticks = ms_to_ticks(state.config.tap_removal_ms) as usize;
        run(&mut state, removal_ticks.saturating_sub(2));
        assert_eq!(state.object(id).map(|o| o.pos.y), frozen_y);

        run(&mut state, 2);
        assert!(state.object(id).is_none());

        let effect_ticks = ms_to_ticks(state.config.effect_ms) as usize;
        run(&mut state, effect_ticks);
        assert!(state.effects.iter().all(|e| e.origin != id));
    }

    #[test]
    fn test_objects_fall_monotonically_and_never_return() {
        for seed in [1u64, 77, 4242] {
            let mut state = GameState::new(seed, GameConfig::lives());
            state.resize(360.0, 480.0);
            state.start();

            let mut last_y: HashMap<u32, f32> = HashMap::new();
            let mut gone: Vec<u32> = Vec::new();
            for _ in 0..1200 {
                tick(&mut state, &TickInput::default(), SIM_DT);
                for obj in &state.objects {
                    assert!(!gone.contains(&obj.id), "object {} came back", obj.id);
                    if let Some(prev) = last_y.get(&obj.id) {
                        assert!(obj.pos.y >= *prev);
                    }
                }
                for id in last_y.keys() {
                    if state.object(*id).is_none() && !gone.contains(id) {
                        gone.push(*id);
                    }
                }
                last_y = state.objects.iter().map(|o| (o.id, o.pos.y)).collect();
                if state.phase != GamePhase::Playing {
                    break;
                }
            }
            assert!(!gone.is_empty());
        }
    }

    #[test]
    fn test_resize_is_clamped() {
        let mut state = GameState::new(1, GameConfig::lives());
        let input = TickInput {
            resize: Some((0.0, 0.0)),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.area.width, MIN_PLAY_WIDTH);
        assert_eq!(state.area.height, MIN_PLAY_HEIGHT);
    }

    #[test]
    fn test_autoplay_scores() {
        let mut state = GameState::new(2024, GameConfig::lives());
        let input = TickInput {
            start: true,
            autoplay: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        let input = TickInput {
            autoplay: true,
            ..Default::default()
        };
        for _ in 0..1800 {
            tick(&mut state, &input, SIM_DT);
        }
        assert!(state.score > 0);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999, GameConfig::sudden_death());
        let mut state2 = GameState::new(99999, GameConfig::sudden_death());

        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state1, &start, SIM_DT);
        tick(&mut state2, &start, SIM_DT);
        run(&mut state1, 300);
        run(&mut state2, 300);

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.objects.len(), state2.objects.len());
        for (a, b) in state1.objects.iter().zip(&state2.objects) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.kind, b.kind);
            assert!((a.pos - b.pos).length() < 0.0001);
        }
    }
}
