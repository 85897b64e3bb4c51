//! Session controller
//!
//! `Start -> Playing -> GameOver -> Playing ...`. Actions that are not valid
//! for the current phase are no-ops.

use super::state::{GameEvent, GamePhase, GameState};
use crate::tuning::FailureMode;

/// Why a failure event happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// A target crossed the boundary line
    Missed,
    /// A decoy was tapped
    WrongTap,
}

impl GameState {
    /// Start action. Only valid from `Start`.
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Start {
            return false;
        }
        self.begin_session();
        true
    }

    /// Restart action. Only valid from `GameOver`.
    pub fn restart(&mut self) -> bool {
        if self.phase != GamePhase::GameOver {
            return false;
        }
        self.begin_session();
        true
    }

    /// Reset everything a session owns and enter `Playing`
    fn begin_session(&mut self) {
        self.score = 0;
        self.difficulty = 0.0;
        self.streak = 0;
        self.lives = self.config.failure.starting_lives();
        self.time_ticks = 0;
        self.objects.clear();
        self.effects.clear();
        self.removals.clear();
        self.autoplay_cooldown = 0;
        self.new_high = false;
        self.rank = None;
        self.sessions += 1;

        self.phase = GamePhase::Playing;
        self.spawn_task.schedule(self.config.spawn.first_spawn_ms);
        self.frame_task.schedule(0.0);

        self.events.push(GameEvent::Started {
            session: self.sessions,
        });
        log::info!(
            "Session {} started ({:?}, seed {})",
            self.sessions,
            self.config.failure,
            self.seed
        );
    }

    /// Apply a failure event under the configured policy
    pub fn apply_failure(&mut self, failure: Failure) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.streak = 0;
        match self.config.failure {
            FailureMode::Lives { .. } => {
                let remaining = self.lives.unwrap_or(0).saturating_sub(1);
                self.lives = Some(remaining);
                self.events.push(GameEvent::LifeLost { remaining });
                log::debug!("{:?}: {} lives left", failure, remaining);
                if remaining == 0 {
                    self.end_session();
                }
            }
            FailureMode::SuddenDeath => {
                log::debug!("{:?}: sudden death", failure);
                self.end_session();
            }
        }
    }

    /// Enter `GameOver`, record the score and stop both loops
    pub(crate) fn end_session(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.spawn_task.cancel();
        self.frame_task.cancel();

        let (new_high, rank) = self
            .high_scores
            .record(self.score, self.difficulty, self.sessions);
        self.new_high = new_high;
        self.rank = rank;
        self.events.push(GameEvent::GameOver {
            score: self.score,
            new_high,
        });
        log::info!(
            "Game over: score {} (best {}, rank {:?})",
            self.score,
            self.high_score(),
            rank
        );
    }

    /// Recompute difficulty from the curve, never letting it drop
    pub(crate) fn refresh_difficulty(&mut self) {
        let level = self
            .config
            .difficulty
            .level(self.score, self.streak, self.elapsed_secs());
        if level > self.difficulty {
            log::debug!("Difficulty {:.2} -> {:.2}", self.difficulty, level);
            self.difficulty = level;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn::spawn_object;
    use crate::tuning::GameConfig;

    #[test]
    fn test_only_listed_transitions() {
        let mut state = GameState::new(1, GameConfig::lives());
        assert!(!state.restart());
        assert_eq!(state.phase, GamePhase::Start);

        assert!(state.start());
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(!state.start());
        assert!(!state.restart());

        state.end_session();
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.start());
        assert!(state.restart());
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_start_arms_tasks() {
        let mut state = GameState::new(1, GameConfig::lives());
        state.start();
        assert!(state.spawn_task.is_scheduled());
        assert!(state.frame_task.is_scheduled());
        assert_eq!(state.drain_events(), vec![GameEvent::Started { session: 1 }]);
    }

    #[test]
    fn test_lives_count_down_to_game_over() {
        let mut state = GameState::new(1, GameConfig::lives());
        state.start();
        state.apply_failure(Failure::Missed);
        assert_eq!(state.lives, Some(2));
        state.apply_failure(Failure::WrongTap);
        assert_eq!(state.lives, Some(1));
        assert_eq!(state.phase, GamePhase::Playing);
        state.apply_failure(Failure::Missed);
        assert_eq!(state.lives, Some(0));
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.spawn_task.is_scheduled());
        assert!(!state.frame_task.is_scheduled());

        // No further penalties once the session is over
        state.apply_failure(Failure::Missed);
        assert_eq!(state.lives, Some(0));
    }

    #[test]
    fn test_sudden_death_ends_immediately() {
        let mut state = GameState::new(1, GameConfig::sudden_death());
        state.start();
        state.score = 4;
        state.apply_failure(Failure::WrongTap);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.score, 4);
        assert_eq!(state.high_score(), 4);
    }

    #[test]
    fn test_restart_resets_session() {
        let mut state = GameState::new(9, GameConfig::lives());
        state.start();
        spawn_object(&mut state);
        spawn_object(&mut state);
        state.score = 12;
        state.difficulty = 2.0;
        state.streak = 12;
        for _ in 0..3 {
            state.apply_failure(Failure::Missed);
        }
        assert_eq!(state.phase, GamePhase::GameOver);

        assert!(state.restart());
        assert_eq!(state.score, 0);
        assert_eq!(state.difficulty, 0.0);
        assert_eq!(state.streak, 0);
        assert_eq!(state.lives, Some(3));
        assert!(state.objects.is_empty());
        assert!(state.effects.is_empty());
        assert_eq!(state.high_score(), 12);
    }

    #[test]
    fn test_high_score_is_max_over_sessions() {
        let mut state = GameState::new(2, GameConfig::sudden_death());
        let scores = [3u64, 11, 0, 7];
        state.start();
        for (i, &score) in scores.iter().enumerate() {
            if i > 0 {
                state.restart();
            }
            state.score = score;
            state.apply_failure(Failure::Missed);
        }
        assert_eq!(state.high_score(), 11);
        assert_eq!(state.high_scores.sessions_recorded(), 4);
    }

    #[test]
    fn test_difficulty_never_drops() {
        let mut state = GameState::new(2, GameConfig::lives());
        state.start();
        state.score = 10;
        state.refresh_difficulty();
        assert_eq!(state.difficulty, 2.0);
        state.score = 0;
        state.refresh_difficulty();
        assert_eq!(state.difficulty, 2.0);
    }
}
