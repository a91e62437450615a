use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use quiz_core::Clock;
use quiz_core::grading;
use quiz_core::model::{
    Answer, Draft, LockRecord, Question, QuestionOutcome, QuestionSet, QuestionSpec,
    QuestionType, QuizSettings, QuizSummary,
};
use tracing::{debug, error, info, trace};

use super::intent::{Intent, Transition};
use super::progress::QuizProgress;
use super::snapshot::QuizSnapshot;
use crate::error::QuizError;

//
// ─── PHASE & TICKETS ───────────────────────────────────────────────────────────
//

/// Top-level state of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    Welcome,
    Playing,
    Results,
}

/// One-shot deferred advance, scheduled after a question locks.
///
/// Only the most recently scheduled ticket can fire; navigation, finishing or
/// restarting cancels it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceTicket {
    pub id: u64,
    /// Question that was locked when the ticket was issued.
    pub index: usize,
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// Quiz progression and scoring state machine.
///
/// All session state lives here. The engine never sleeps or spawns; it exposes
/// what should be scheduled (`timer_active`, `timer_epoch`, `pending_advance`)
/// and a driver such as [`super::QuizRunner`] delivers ticks and fires tickets.
pub struct QuizEngine {
    questions: QuestionSet,
    settings: QuizSettings,
    clock: Clock,

    phase: QuizPhase,
    current: usize,
    score: u32,
    drafts: HashMap<usize, Draft>,
    submitted: HashMap<usize, Answer>,
    locks: HashMap<usize, LockRecord>,
    time_remaining: u32,

    timer_epoch: u64,
    next_ticket: u64,
    pending_advance: Option<AdvanceTicket>,

    started_at: Option<DateTime<Utc>>,
    summary: Option<QuizSummary>,
}

impl QuizEngine {
    /// Create an engine in the Welcome phase.
    #[must_use]
    pub fn new(questions: QuestionSet, settings: QuizSettings, clock: Clock) -> Self {
        Self {
            time_remaining: settings.seconds_per_question(),
            questions,
            settings,
            clock,
            phase: QuizPhase::Welcome,
            current: 0,
            score: 0,
            drafts: HashMap::new(),
            submitted: HashMap::new(),
            locks: HashMap::new(),
            timer_epoch: 0,
            next_ticket: 0,
            pending_advance: None,
            started_at: None,
            summary: None,
        }
    }

    /// Validate raw question specs and build an engine from them.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidConfiguration` if the set is empty or any
    /// question fails validation.
    pub fn from_specs(
        specs: Vec<QuestionSpec>,
        settings: QuizSettings,
        clock: Clock,
    ) -> Result<Self, QuizError> {
        let questions = QuestionSet::from_specs(specs)?;
        Ok(Self::new(questions, settings, clock))
    }

    //
    // ─── DISPATCH ──────────────────────────────────────────────────────────────
    //

    /// Single entry point for intents. Inapplicable intents are no-ops.
    pub fn dispatch(&mut self, intent: Intent) -> Transition {
        let applied = match &intent {
            Intent::Start => {
                self.start();
                true
            }
            Intent::SelectSingleChoice(option) => self.select_single_choice(option),
            Intent::ToggleMultiSelectOption(option) => self.toggle_multi_select_option(option),
            Intent::SubmitMultiSelect => self.submit_multi_select(),
            Intent::SetFillBlankText(text) => self.set_fill_blank_text(text),
            Intent::SubmitFillBlank => self.submit_fill_blank(),
            Intent::Skip => self.skip(),
            Intent::GoToPrevious => self.go_to_previous(),
            Intent::GoToNext => self.go_to_next(),
            Intent::FinishNow => self.finish_now(),
            Intent::Tick => self.tick(),
        };

        if applied {
            trace!(?intent, index = self.current, "intent applied");
        } else {
            debug!(?intent, phase = ?self.phase, index = self.current, "intent ignored");
        }
        Transition::from_applied(applied)
    }

    /// Begin a fresh session. Every field is reset; there is no partial reset.
    pub fn start(&mut self) {
        self.phase = QuizPhase::Playing;
        self.score = 0;
        self.drafts.clear();
        self.submitted.clear();
        self.locks.clear();
        self.summary = None;
        self.started_at = Some(self.clock.now());
        self.enter_question(0);
        info!(
            questions = self.questions.len(),
            total_points = self.questions.total_points(),
            "quiz session started"
        );
    }

    pub fn select_single_choice(&mut self, option: &str) -> bool {
        if !self.accepts_input_for(QuestionType::SingleChoice) {
            return false;
        }
        let Some(question) = self.current_question() else {
            return false;
        };
        if !question.has_option(option) {
            return false;
        }
        self.lock_answer(Answer::Single(option.to_owned()));
        true
    }

    pub fn toggle_multi_select_option(&mut self, option: &str) -> bool {
        if !self.accepts_input_for(QuestionType::MultiChoice) {
            return false;
        }
        let Some(question) = self.current_question() else {
            return false;
        };
        if !question.has_option(option) {
            return false;
        }
        self.drafts
            .entry(self.current)
            .or_insert_with(Draft::empty_multi)
            .toggle(option)
    }

    /// Lock the multi-select draft. Rejected when nothing is selected.
    pub fn submit_multi_select(&mut self) -> bool {
        if !self.accepts_input_for(QuestionType::MultiChoice) {
            return false;
        }
        self.submit_draft()
    }

    /// Replace the fill-blank draft. No correctness feedback while editing.
    pub fn set_fill_blank_text(&mut self, text: &str) -> bool {
        if !self.accepts_input_for(QuestionType::FillBlank) {
            return false;
        }
        self.drafts
            .entry(self.current)
            .or_insert_with(Draft::empty_text)
            .set_text(text)
    }

    /// Lock the fill-blank draft. Rejected when the trimmed draft is empty.
    pub fn submit_fill_blank(&mut self) -> bool {
        if !self.accepts_input_for(QuestionType::FillBlank) {
            return false;
        }
        self.submit_draft()
    }

    /// Move on without resolving the current question. No lock, no points.
    pub fn skip(&mut self) -> bool {
        if !self.is_playing() || self.is_locked(self.current) {
            return false;
        }
        debug!(index = self.current, "question skipped");
        self.advance_forward();
        true
    }

    pub fn go_to_previous(&mut self) -> bool {
        if !self.is_playing() || self.current == 0 {
            return false;
        }
        self.enter_question(self.current - 1);
        true
    }

    /// Next question, or Results from the last one whether or not it is locked.
    pub fn go_to_next(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.advance_forward();
        true
    }

    pub fn finish_now(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.finish();
        true
    }

    /// One second elapsed. Applies only while the current question is unlocked.
    pub fn tick(&mut self) -> bool {
        if !self.timer_active() || self.time_remaining == 0 {
            return false;
        }
        self.time_remaining -= 1;
        trace!(
            index = self.current,
            remaining = self.time_remaining,
            "tick"
        );
        if self.time_remaining == 0 {
            self.time_out();
        }
        true
    }

    /// Fire a deferred advance. Stale or cancelled tickets are ignored.
    pub fn fire_advance(&mut self, ticket_id: u64) -> Transition {
        let matches = self
            .pending_advance
            .is_some_and(|ticket| ticket.id == ticket_id);
        if !matches || !self.is_playing() {
            debug!(ticket_id, "stale advance ticket dropped");
            return Transition::Ignored;
        }
        self.pending_advance = None;
        self.advance_forward();
        Transition::Applied
    }

    //
    // ─── INTERNALS ─────────────────────────────────────────────────────────────
    //

    fn is_playing(&self) -> bool {
        self.phase == QuizPhase::Playing
    }

    fn accepts_input_for(&self, kind: QuestionType) -> bool {
        self.is_playing()
            && !self.is_locked(self.current)
            && self
                .current_question()
                .is_some_and(|question| question.question_type() == kind)
    }

    fn submit_draft(&mut self) -> bool {
        let Some(answer) = self.drafts.get(&self.current).and_then(Draft::to_answer) else {
            return false;
        };
        self.lock_answer(answer);
        true
    }

    /// Entering a question restarts its countdown and drops any pending advance.
    /// Feedback visibility follows from whether the question is already locked.
    fn enter_question(&mut self, index: usize) {
        self.current = index;
        self.time_remaining = self.settings.seconds_per_question();
        self.pending_advance = None;
        self.bump_epoch();
    }

    fn lock_answer(&mut self, answer: Answer) {
        let Some(question) = self.questions.get(self.current) else {
            return;
        };
        let is_correct = grading::grade(question, &answer);
        let points = question.points();

        self.submitted.insert(self.current, answer);
        self.locks
            .insert(self.current, LockRecord::answered(is_correct));
        if is_correct {
            self.score = self.score.saturating_add(points);
        }
        info!(
            index = self.current,
            is_correct,
            score = self.score,
            "answer locked"
        );
        self.bump_epoch();
        self.schedule_advance();
    }

    fn time_out(&mut self) {
        self.locks.insert(self.current, LockRecord::timed_out());
        info!(index = self.current, "question timed out");
        self.bump_epoch();
        self.schedule_advance();
    }

    fn schedule_advance(&mut self) {
        self.next_ticket += 1;
        self.pending_advance = Some(AdvanceTicket {
            id: self.next_ticket,
            index: self.current,
        });
    }

    fn advance_forward(&mut self) {
        if self.current >= self.questions.last_index() {
            self.finish();
        } else {
            self.enter_question(self.current + 1);
        }
    }

    fn finish(&mut self) {
        self.phase = QuizPhase::Results;
        self.pending_advance = None;
        self.bump_epoch();
        self.summary = self.build_summary();
        info!(
            score = self.score,
            total_points = self.questions.total_points(),
            "quiz session finished"
        );
    }

    fn bump_epoch(&mut self) {
        self.timer_epoch = self.timer_epoch.wrapping_add(1);
    }

    /// Correctness is re-derived from submitted answers, not taken from locks.
    fn outcome(&self, index: usize, question: &Question) -> QuestionOutcome {
        match (self.submitted.get(&index), self.locks.get(&index)) {
            (Some(answer), _) if grading::grade(question, answer) => QuestionOutcome::Correct,
            (Some(_), _) => QuestionOutcome::Incorrect,
            (None, Some(lock)) if lock.is_timeout() => QuestionOutcome::TimedOut,
            (None, _) => QuestionOutcome::Unanswered,
        }
    }

    fn build_summary(&self) -> Option<QuizSummary> {
        let outcomes = self
            .questions
            .iter()
            .enumerate()
            .map(|(index, question)| self.outcome(index, question))
            .collect();
        let now = self.clock.now();
        let started_at = self.started_at.unwrap_or(now);
        // The system clock may step backwards mid-session.
        let completed_at = now.max(started_at);

        match QuizSummary::from_outcomes(
            started_at,
            completed_at,
            self.score,
            self.questions.total_points(),
            outcomes,
        ) {
            Ok(summary) => Some(summary),
            Err(err) => {
                error!(%err, "failed to build quiz summary");
                None
            }
        }
    }

    //
    // ─── ACCESSORS ─────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total_points(&self) -> u32 {
        self.questions.total_points()
    }

    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    #[must_use]
    pub fn is_locked(&self, index: usize) -> bool {
        self.locks.contains_key(&index)
    }

    #[must_use]
    pub fn lock(&self, index: usize) -> Option<LockRecord> {
        self.locks.get(&index).copied()
    }

    #[must_use]
    pub fn draft(&self, index: usize) -> Option<&Draft> {
        self.drafts.get(&index)
    }

    #[must_use]
    pub fn submitted_answer(&self, index: usize) -> Option<&Answer> {
        self.submitted.get(&index)
    }

    /// True while playing a question that already has a lock record.
    #[must_use]
    pub fn feedback_visible(&self) -> bool {
        self.is_playing() && self.is_locked(self.current)
    }

    /// True while the countdown should be running.
    #[must_use]
    pub fn timer_active(&self) -> bool {
        self.is_playing() && !self.is_locked(self.current)
    }

    /// Changes whenever the countdown has to be restarted or stopped.
    #[must_use]
    pub fn timer_epoch(&self) -> u64 {
        self.timer_epoch
    }

    #[must_use]
    pub fn pending_advance(&self) -> Option<AdvanceTicket> {
        self.pending_advance
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Results summary, available once the session reaches Results.
    #[must_use]
    pub fn summary(&self) -> Option<&QuizSummary> {
        self.summary.as_ref()
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let total = self.questions.len();
        let resolved = self.locks.len();
        QuizProgress {
            total,
            resolved,
            unresolved: total.saturating_sub(resolved),
            is_complete: self.phase == QuizPhase::Results,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> QuizSnapshot {
        QuizSnapshot::capture(self)
    }
}

impl fmt::Debug for QuizEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizEngine")
            .field("phase", &self.phase)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("score", &self.score)
            .field("locks_len", &self.locks.len())
            .field("time_remaining", &self.time_remaining)
            .field("timer_epoch", &self.timer_epoch)
            .field("pending_advance", &self.pending_advance)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
