use quiz_core::model::{Answer, Draft, LockRecord, Question, QuizSummary};

use super::engine::{QuizEngine, QuizPhase};
use super::progress::QuizProgress;

/// Presentation-facing copy of engine state.
///
/// This is intentionally **not** a UI view-model:
/// - no pre-formatted strings
/// - no styling or tier colors
///
/// The presentation layer renders from it and sends intents back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSnapshot {
    pub phase: QuizPhase,
    pub current_index: usize,
    pub question_count: usize,
    /// Set while playing.
    pub question: Option<Question>,
    pub seconds_per_question: u32,
    pub time_remaining: u32,
    pub feedback_visible: bool,
    pub lock: Option<LockRecord>,
    pub draft: Option<Draft>,
    pub submitted: Option<Answer>,
    pub score: u32,
    pub total_points: u32,
    pub progress: QuizProgress,
    /// Set once the session reaches Results.
    pub summary: Option<QuizSummary>,
}

impl QuizSnapshot {
    #[must_use]
    pub fn capture(engine: &QuizEngine) -> Self {
        let playing = engine.phase() == QuizPhase::Playing;
        let index = engine.current_index();
        Self {
            phase: engine.phase(),
            current_index: index,
            question_count: engine.questions().len(),
            question: playing
                .then(|| engine.current_question().cloned())
                .flatten(),
            seconds_per_question: engine.settings().seconds_per_question(),
            time_remaining: engine.time_remaining(),
            feedback_visible: engine.feedback_visible(),
            lock: playing.then(|| engine.lock(index)).flatten(),
            draft: playing.then(|| engine.draft(index).cloned()).flatten(),
            submitted: playing
                .then(|| engine.submitted_answer(index).cloned())
                .flatten(),
            score: engine.score(),
            total_points: engine.total_points(),
            progress: engine.progress(),
            summary: engine.summary().cloned(),
        }
    }

    /// `(current_index + 1, question_count)` for "Question n of m" headers.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        (self.current_index + 1, self.question_count)
    }
}
