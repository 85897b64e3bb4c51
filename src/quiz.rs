//! Multiple-choice arithmetic quiz
//!
//! Ten questions per round, one locked answer per question, a short feedback
//! pause, then the next question. Questions come from a `QuestionSource`
//! supplied by the caller.
//!
//! Library-only: neither shell drives a quiz, and no question bank ships with
//! the crate.

use serde::{Deserialize, Serialize};

/// Questions per round
pub const TOTAL_QUESTIONS: u32 = 10;
/// Pause after an answer before the next question
pub const FEEDBACK_DELAY_MS: f32 = 1500.0;
/// Streak length that lights the HUD streak badge
pub const STREAK_BADGE: u32 = 2;
/// Streak length called out in the answer feedback
pub const STREAK_CALLOUT: u32 = 3;

/// One multiple-choice question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    /// Compared textually with the picked choice
    pub answer: String,
    pub choices: Vec<String>,
}

/// Supplies questions for a round
pub trait QuestionSource {
    fn next_question(&mut self) -> Question;
}

/// Current phase of the quiz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizPhase {
    Start,
    Playing,
    Results,
}

/// Feedback shown after an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feedback {
    Correct { streak: u32 },
    Wrong { answer: String },
}

impl Feedback {
    /// Whether the feedback should announce the streak
    pub fn shows_streak_callout(&self) -> bool {
        matches!(self, Feedback::Correct { streak } if *streak >= STREAK_CALLOUT)
    }
}

/// One answered question, for the results screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub question: String,
    pub answer: String,
    pub picked: String,
    pub correct: bool,
}

/// Quiz session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSession {
    pub phase: QuizPhase,
    pub current: Option<Question>,
    /// Questions answered so far this round
    pub answered: u32,
    pub score: u32,
    pub streak: u32,
    /// Locked choice for the current question
    pub selected: Option<String>,
    pub feedback: Option<Feedback>,
    pub history: Vec<HistoryEntry>,
    /// Countdown until the next question, while feedback is showing
    advance_in_ms: Option<f32>,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            phase: QuizPhase::Start,
            current: None,
            answered: 0,
            score: 0,
            streak: 0,
            selected: None,
            feedback: None,
            history: Vec::new(),
            advance_in_ms: None,
        }
    }

    /// Start a round from the title screen
    pub fn start(&mut self, source: &mut dyn QuestionSource) -> bool {
        if self.phase != QuizPhase::Start {
            return false;
        }
        self.begin_round(source);
        true
    }

    /// Play again from the results screen
    pub fn restart(&mut self, source: &mut dyn QuestionSource) -> bool {
        if self.phase != QuizPhase::Results {
            return false;
        }
        self.begin_round(source);
        true
    }

    fn begin_round(&mut self, source: &mut dyn QuestionSource) {
        self.answered = 0;
        self.score = 0;
        self.streak = 0;
        self.history.clear();
        self.phase = QuizPhase::Playing;
        self.load_question(source);
        log::info!("Quiz round started");
    }

    fn load_question(&mut self, source: &mut dyn QuestionSource) {
        self.current = Some(source.next_question());
        self.selected = None;
        self.feedback = None;
        self.advance_in_ms = None;
    }

    /// Pick a choice. Returns whether it was correct, or `None` if the pick
    /// was ignored (not playing, or an answer is already locked in).
    pub fn choose(&mut self, choice: &str) -> Option<bool> {
        if self.phase != QuizPhase::Playing || self.selected.is_some() {
            return None;
        }
        let question = self.current.as_ref()?;
        let correct = choice == question.answer;

        self.history.push(HistoryEntry {
            question: question.prompt.clone(),
            answer: question.answer.clone(),
            picked: choice.to_string(),
            correct,
        });
        self.feedback = Some(if correct {
            self.score += 1;
            self.streak += 1;
            Feedback::Correct {
                streak: self.streak,
            }
        } else {
            self.streak = 0;
            Feedback::Wrong {
                answer: question.answer.clone(),
            }
        });
        self.selected = Some(choice.to_string());
        self.advance_in_ms = Some(FEEDBACK_DELAY_MS);
        Some(correct)
    }

    /// Let time pass; moves on once the feedback pause is over
    pub fn advance(&mut self, elapsed_ms: f32, source: &mut dyn QuestionSource) {
        if self.phase != QuizPhase::Playing {
            return;
        }
        let Some(remaining) = self.advance_in_ms.as_mut() else {
            return;
        };
        *remaining -= elapsed_ms;
        if *remaining > 0.0 {
            return;
        }

        self.answered += 1;
        if self.answered >= TOTAL_QUESTIONS {
            self.phase = QuizPhase::Results;
            self.current = None;
            self.advance_in_ms = None;
            log::info!("Quiz finished: {}/{}", self.score, TOTAL_QUESTIONS);
        } else {
            self.load_question(source);
        }
    }

    /// Whether the HUD shows the streak badge
    pub fn shows_streak_badge(&self) -> bool {
        self.streak >= STREAK_BADGE
    }

    /// 1-based number of the question on screen
    pub fn question_number(&self) -> u32 {
        (self.answered + 1).min(TOTAL_QUESTIONS)
    }

    /// Score as a rounded percentage
    pub fn percent(&self) -> u32 {
        (self.score as f32 / TOTAL_QUESTIONS as f32 * 100.0).round() as u32
    }

    pub fn grade(&self) -> &'static str {
        grade_for_percent(self.percent())
    }
}

/// Letter grade for a percentage score
pub fn grade_for_percent(pct: u32) -> &'static str {
    match pct {
        90.. => "A+",
        80..=89 => "A",
        70..=79 => "B",
        60..=69 => "C",
        _ => "Keep practicing!",
    }
}
