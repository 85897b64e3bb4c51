//! High score leaderboard
//!
//! Lives in process memory only and is gone when the page closes. Tracks the
//! best score seen at any game over plus the top 10 non-zero runs.

use serde::{Deserialize, Serialize};

/// Maximum number of leaderboard entries to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player's score
    pub score: u64,
    /// Difficulty reached when the session ended
    pub difficulty: f32,
    /// 1-based session number within this process
    pub session: u32,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    /// Max score observed at any game over, zero included
    best: u64,
    /// Sessions recorded, qualifying or not
    recorded: u32,
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Best score so far (0 before the first game over)
    pub fn best(&self) -> u64 {
        self.best
    }

    /// Number of finished sessions recorded
    pub fn sessions_recorded(&self) -> u32 {
        self.recorded
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Record a finished session. Returns whether it beat the previous best
    /// and the leaderboard rank it took, if any.
    pub fn record(&mut self, score: u64, difficulty: f32, session: u32) -> (bool, Option<usize>) {
        self.recorded += 1;
        let new_high = score > self.best;
        self.best = self.best.max(score);

        if !self.qualifies(score) {
            return (new_high, None);
        }

        let entry = HighScoreEntry {
            score,
            difficulty,
            session,
        };

        // Find insertion point (sorted descending by score, ties keep the earlier run first)
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        (new_high, Some(rank))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_tracks_max_including_zero() {
        let mut scores = HighScores::new();
        assert_eq!(scores.record(0, 0.0, 1), (false, None));
        assert_eq!(scores.best(), 0);
        assert_eq!(scores.sessions_recorded(), 1);
        assert!(scores.entries.is_empty());

        assert_eq!(scores.record(7, 1.0, 2), (true, Some(1)));
        assert_eq!(scores.record(3, 0.0, 3), (false, Some(2)));
        assert_eq!(scores.record(7, 1.0, 4), (false, Some(2)));
        assert_eq!(scores.best(), 7);
        assert_eq!(scores.entries[0].session, 2);
    }

    #[test]
    fn test_leaderboard_is_capped_and_sorted() {
        let mut scores = HighScores::new();
        for (i, score) in (1..=15u64).enumerate() {
            scores.record(score, 0.0, i as u32 + 1);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.first().map(|e| e.score), Some(15));
        assert_eq!(scores.entries.last().map(|e| e.score), Some(6));
        assert!(!scores.qualifies(6));
        assert_eq!(scores.record(100, 0.0, 16), (true, Some(1)));
        assert_eq!(scores.record(8, 0.0, 17), (false, Some(10)));
        assert_eq!(scores.record(2, 0.0, 18), (false, None));
    }
}
