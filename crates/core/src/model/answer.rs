use serde::{Deserialize, Serialize};

//
// ─── SUBMITTED ANSWER ─────────────────────────────────────────────────────────
//

/// An answer as it was submitted for grading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Answer {
    /// The chosen option of a single-choice question.
    Single(String),
    /// The selected options of a multi-choice question, in toggle order.
    Multi(Vec<String>),
    /// Raw fill-blank text, untrimmed.
    Text(String),
}

//
// ─── DRAFT ────────────────────────────────────────────────────────────────────
//

/// In-progress input for a question that needs an explicit submit.
///
/// Single-choice questions never have a draft: picking an option submits it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Draft {
    Multi(Vec<String>),
    Text(String),
}

impl Draft {
    #[must_use]
    pub fn empty_multi() -> Self {
        Self::Multi(Vec::new())
    }

    #[must_use]
    pub fn empty_text() -> Self {
        Self::Text(String::new())
    }

    /// Flip membership of `option` in a multi-select draft.
    ///
    /// Returns false (and does nothing) for a text draft.
    pub fn toggle(&mut self, option: &str) -> bool {
        let Self::Multi(selected) = self else {
            return false;
        };
        if let Some(pos) = selected.iter().position(|chosen| chosen == option) {
            selected.remove(pos);
        } else {
            selected.push(option.to_owned());
        }
        true
    }

    /// Replace the text of a fill-blank draft.
    ///
    /// Returns false (and does nothing) for a multi-select draft.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        let Self::Text(current) = self else {
            return false;
        };
        *current = text.into();
        true
    }

    #[must_use]
    pub fn selected(&self) -> &[String] {
        match self {
            Self::Multi(selected) => selected,
            Self::Text(_) => &[],
        }
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Multi(_) => None,
        }
    }

    /// An empty selection or a whitespace-only text cannot be submitted.
    #[must_use]
    pub fn is_submittable(&self) -> bool {
        match self {
            Self::Multi(selected) => !selected.is_empty(),
            Self::Text(text) => !text.trim().is_empty(),
        }
    }

    /// The answer this draft would submit, if it is submittable.
    #[must_use]
    pub fn to_answer(&self) -> Option<Answer> {
        if !self.is_submittable() {
            return None;
        }
        Some(match self {
            Self::Multi(selected) => Answer::Multi(selected.clone()),
            Self::Text(text) => Answer::Text(text.clone()),
        })
    }
}

//
// ─── LOCK RECORD ──────────────────────────────────────────────────────────────
//

/// How a question came to be locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockReason {
    Answered,
    TimedOut,
}

/// Final outcome attached to a resolved question. Never changes once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRecord {
    pub is_correct: bool,
    pub reason: LockReason,
}

impl LockRecord {
    #[must_use]
    pub fn answered(is_correct: bool) -> Self {
        Self {
            is_correct,
            reason: LockReason::Answered,
        }
    }

    #[must_use]
    pub fn timed_out() -> Self {
        Self {
            is_correct: false,
            reason: LockReason::TimedOut,
        }
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.reason == LockReason::TimedOut
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let mut draft = Draft::empty_multi();
        assert!(draft.toggle("Python"));
        assert!(draft.toggle("JavaScript"));
        assert!(draft.toggle("Python"));
        assert_eq!(draft.selected(), ["JavaScript".to_string()]);
    }

    #[test]
    fn mismatched_draft_edits_are_refused() {
        let mut text = Draft::empty_text();
        assert!(!text.toggle("A"));
        let mut multi = Draft::empty_multi();
        assert!(!multi.set_text("hello"));
        assert_eq!(multi, Draft::empty_multi());
    }

    #[test]
    fn blank_drafts_are_not_submittable() {
        assert!(Draft::empty_multi().to_answer().is_none());
        assert!(Draft::Text("   ".into()).to_answer().is_none());
        assert_eq!(
            Draft::Text(" X ".into()).to_answer(),
            Some(Answer::Text(" X ".into()))
        );
    }

    #[test]
    fn timeout_lock_is_incorrect() {
        let lock = LockRecord::timed_out();
        assert!(!lock.is_correct);
        assert!(lock.is_timeout());
        assert!(!LockRecord::answered(true).is_timeout());
    }
}
