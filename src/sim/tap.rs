//! Input handler: taps on live objects

use super::session::Failure;
use super::state::{EffectKind, GameEvent, GamePhase, GameState, ObjectKind, ms_to_ticks};
use super::timers::Removal;

/// Result of a tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// Not playing, unknown/stale id, or already tapped
    Ignored,
    /// Correct kind tapped
    Caught,
    /// Wrong kind tapped
    Blunder,
}

/// Handle a tap on the object with `id`
pub fn tap(state: &mut GameState, id: u32) -> TapOutcome {
    if state.phase != GamePhase::Playing {
        return TapOutcome::Ignored;
    }
    let Some(obj) = state.objects.iter_mut().find(|o| o.id == id) else {
        log::trace!("Tap on stale object #{}", id);
        return TapOutcome::Ignored;
    };
    if obj.tapped {
        return TapOutcome::Ignored;
    }
    obj.tapped = true;
    let obj = obj.clone();

    let due = state.time_ticks + ms_to_ticks(state.config.tap_removal_ms);
    state.removals.schedule(Removal::Object(id), due);

    match obj.kind {
        ObjectKind::Target => {
            state.score += 1;
            state.streak += 1;
            state.refresh_difficulty();
            state.push_effect(&obj, EffectKind::Catch);
            state.events.push(GameEvent::Caught {
                id,
                score: state.score,
            });
            TapOutcome::Caught
        }
        ObjectKind::Decoy => {
            state.push_effect(&obj, EffectKind::Blunder);
            state.events.push(GameEvent::Blunder { id });
            state.apply_failure(Failure::WrongTap);
            TapOutcome::Blunder
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{FallingObject, Wobble};
    use crate::tuning::GameConfig;
    use glam::Vec2;

    fn place(state: &mut GameState, kind: ObjectKind) -> u32 {
        let id = state.next_entity_id();
        state.objects.push(FallingObject {
            id,
            kind,
            pos: Vec2::new(100.0, 100.0),
            velocity: 2.0,
            size: 48.0,
            wobble: Wobble {
                phase: 0.0,
                speed: 0.0,
                amplitude: 0.0,
            },
            glyph: 0,
            tapped: false,
        });
        id
    }

    #[test]
    fn test_catch_scores_once() {
        let mut state = GameState::new(1, GameConfig::lives());
        state.start();
        let id = place(&mut state, ObjectKind::Target);

        assert_eq!(tap(&mut state, id), TapOutcome::Caught);
        assert_eq!(tap(&mut state, id), TapOutcome::Ignored);
        assert_eq!(state.score, 1);
        assert_eq!(state.streak, 1);
        assert!(state.object(id).unwrap().tapped);
        assert_eq!(state.effects.len(), 1);
        assert_eq!(state.effects[0].kind, EffectKind::Catch);
    }

    #[test]
    fn test_blunder_in_lives_mode_costs_one_life() {
        let mut state = GameState::new(1, GameConfig::lives());
        state.start();
        let id = place(&mut state, ObjectKind::Decoy);

        assert_eq!(tap(&mut state, id), TapOutcome::Blunder);
        assert_eq!(tap(&mut state, id), TapOutcome::Ignored);
        assert_eq!(state.lives, Some(2));
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_sudden_death_decoy_tap_ends_session() {
        let mut state = GameState::new(1, GameConfig::sudden_death());
        state.start();
        let target = place(&mut state, ObjectKind::Target);
        let decoy = place(&mut state, ObjectKind::Decoy);
        tap(&mut state, target);
        assert_eq!(state.score, 1);

        assert_eq!(tap(&mut state, decoy), TapOutcome::Blunder);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_taps_ignored_outside_playing() {
        let mut state = GameState::new(1, GameConfig::lives());
        let id = place(&mut state, ObjectKind::Target);
        assert_eq!(tap(&mut state, id), TapOutcome::Ignored);
        assert!(!state.object(id).unwrap().tapped);
    }

    #[test]
    fn test_stale_id_is_ignored() {
        let mut state = GameState::new(1, GameConfig::lives());
        state.start();
        assert_eq!(tap(&mut state, 999), TapOutcome::Ignored);
        assert_eq!(state.lives, Some(3));
    }

    #[test]
    fn test_five_catches_raise_difficulty() {
        let mut state = GameState::new(1, GameConfig::lives());
        state.start();
        let before = state.difficulty;
        for _ in 0..5 {
            let id = place(&mut state, ObjectKind::Target);
            assert_eq!(tap(&mut state, id), TapOutcome::Caught);
        }
        assert_eq!(state.score, 5);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.difficulty > before);
    }
}
