use std::fmt::Write as _;

use quiz_core::model::{Answer, Draft, QuestionOutcome, QuestionType, QuizSummary};
use services::{QuizPhase, QuizSnapshot};

pub const HELP: &str = "\
commands:
  <n>        pick option n (single choice) or toggle it (multi choice)
  <text>     set the fill-blank answer
  :submit    submit a multi choice or fill-blank answer
  :skip      skip the question
  :next      next question (results after the last one)
  :prev      previous question
  :finish    finish now
  :start     start or retake the quiz
  :quit      exit";

/// The parts of a snapshot that require a full redraw when they change.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ScreenKey {
    phase: QuizPhase,
    index: usize,
    locked: bool,
    draft: Option<Draft>,
}

impl ScreenKey {
    fn of(snapshot: &QuizSnapshot) -> Self {
        Self {
            phase: snapshot.phase,
            index: snapshot.current_index,
            locked: snapshot.lock.is_some(),
            draft: snapshot.draft.clone(),
        }
    }
}

/// Decides what to print for each new snapshot.
#[derive(Debug, Default)]
pub struct Screen {
    last: Option<ScreenKey>,
}

impl Screen {
    pub fn update(&mut self, title: &str, snapshot: &QuizSnapshot) -> Option<String> {
        let key = ScreenKey::of(snapshot);
        if self.last.as_ref() != Some(&key) {
            self.last = Some(key);
            return Some(render(title, snapshot));
        }
        if snapshot.phase == QuizPhase::Playing
            && snapshot.lock.is_none()
            && (snapshot.time_remaining <= 3 || snapshot.time_remaining % 5 == 0)
        {
            return Some(format_timer(snapshot.time_remaining));
        }
        None
    }
}

#[must_use]
pub fn render(title: &str, snapshot: &QuizSnapshot) -> String {
    match snapshot.phase {
        QuizPhase::Welcome => render_welcome(title, snapshot),
        QuizPhase::Playing => render_question(snapshot),
        QuizPhase::Results => snapshot
            .summary
            .as_ref()
            .map_or_else(|| "Quiz finished.".to_string(), render_results),
    }
}

fn render_welcome(title: &str, snapshot: &QuizSnapshot) -> String {
    let count = snapshot.question_count;
    let points = snapshot.total_points;
    let seconds = snapshot.seconds_per_question;
    format!(
        "== {title} ==\n{count} questions, {points} points, {seconds} seconds per question.\n\
         Press enter to start, :help for commands."
    )
}

fn render_question(snapshot: &QuizSnapshot) -> String {
    let Some(question) = &snapshot.question else {
        return String::new();
    };
    let (position, count) = snapshot.position();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\nQuestion {position} of {count}  |  score {}  |  {}",
        snapshot.score,
        format_timer(snapshot.time_remaining)
    );
    let _ = writeln!(out, "{} ({} pts)", question.prompt(), question.points());

    let selected = snapshot.draft.as_ref().map_or(&[][..], Draft::selected);
    for (i, option) in question.options().iter().enumerate() {
        let mark = match (&snapshot.submitted, question.question_type()) {
            (Some(Answer::Single(chosen)), _) if chosen == option => "[x]",
            (_, QuestionType::MultiChoice) if selected.contains(option) => "[x]",
            (_, QuestionType::MultiChoice) => "[ ]",
            _ => "   ",
        };
        let _ = writeln!(out, "  {mark} {}. {option}", i + 1);
    }
    if let Some(text) = snapshot.draft.as_ref().and_then(Draft::text) {
        let _ = writeln!(out, "  answer: {text}");
    }

    match snapshot.lock {
        Some(lock) if lock.is_correct => out.push_str("Correct!"),
        Some(lock) if lock.is_timeout() => out.push_str("Time's up!"),
        Some(_) => {
            let key = question.answer_key().join(", ");
            let _ = write!(out, "Incorrect. Answer: {key}");
        }
        None => {}
    }
    out
}

fn render_results(summary: &QuizSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n== Results ==");
    let _ = writeln!(
        out,
        "{} / {} points ({}%): {}",
        summary.score(),
        summary.total_points(),
        summary.percentage(),
        summary.tier().label()
    );
    let _ = writeln!(
        out,
        "correct {}  incorrect {}  (timed out {}, unanswered {})",
        summary.correct_count(),
        summary.incorrect_count(),
        summary.timed_out_count(),
        summary.unanswered_count()
    );
    for (i, outcome) in summary.outcomes().iter().enumerate() {
        let label = match outcome {
            QuestionOutcome::Correct => "correct",
            QuestionOutcome::Incorrect => "incorrect",
            QuestionOutcome::TimedOut => "timed out",
            QuestionOutcome::Unanswered => "unanswered",
        };
        let _ = writeln!(out, "  Q{}: {label}", i + 1);
    }
    out.push_str(":start to retake, :quit to exit");
    out
}

fn format_timer(seconds: u32) -> String {
    let minutes = seconds / 60;
    let remainder = seconds % 60;
    format!("Time: {minutes}:{remainder:02}")
}
