//! Pure grading rules, one per question kind.
//!
//! None of these functions look at session state; the engine calls them at the
//! moment an answer is locked and again when building the results summary.

use std::collections::HashSet;

use crate::model::{Answer, Question, QuestionKind};

/// Trim surrounding whitespace and case-fold.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}

#[must_use]
pub fn is_single_correct(chosen: &str, correct: &str) -> bool {
    chosen == correct
}

/// Exact set match: same size and every chosen option is in the correct set.
///
/// Duplicate picks never make a selection correct.
#[must_use]
pub fn is_multi_correct(chosen: &[String], correct: &[String]) -> bool {
    let chosen_set: HashSet<&str> = chosen.iter().map(String::as_str).collect();
    let correct_set: HashSet<&str> = correct.iter().map(String::as_str).collect();
    chosen_set.len() == chosen.len() && chosen_set == correct_set
}

#[must_use]
pub fn is_fill_blank_correct(submitted: &str, correct: &str, alternatives: &[String]) -> bool {
    let submitted = normalize_text(submitted);
    std::iter::once(correct)
        .chain(alternatives.iter().map(String::as_str))
        .any(|accepted| normalize_text(accepted) == submitted)
}

/// Grade `answer` against `question`. An answer of the wrong kind is incorrect.
#[must_use]
pub fn grade(question: &Question, answer: &Answer) -> bool {
    match (question.kind(), answer) {
        (QuestionKind::SingleChoice { correct, .. }, Answer::Single(chosen)) => {
            is_single_correct(chosen, correct)
        }
        (QuestionKind::MultiChoice { correct, .. }, Answer::Multi(chosen)) => {
            is_multi_correct(chosen, correct)
        }
        (
            QuestionKind::FillBlank {
                correct,
                alternatives,
            },
            Answer::Text(text),
        ) => is_fill_blank_correct(text, correct, alternatives),
        _ => false,
    }
}

/// `round(100 * score / total)`, rounding halves up. Zero when `total` is zero.
#[must_use]
pub fn percentage(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let score = u64::from(score);
    let total = u64::from(total);
    let rounded = (200 * score + total) / (2 * total);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn multi_choice_requires_exact_set_in_any_order() {
        let correct = strings(&["Chrome", "Firefox", "Safari"]);
        let reordered = strings(&["Safari", "Chrome", "Firefox"]);
        let subset = strings(&["Chrome", "Firefox"]);
        let superset = strings(&["Chrome", "Firefox", "Safari", "Excel"]);
        let repeated = strings(&["Chrome", "Chrome", "Firefox"]);
        assert!(is_multi_correct(&reordered, &correct));
        assert!(!is_multi_correct(&subset, &correct));
        assert!(!is_multi_correct(&superset, &correct));
        assert!(!is_multi_correct(&repeated, &correct));
    }

    #[test]
    fn fill_blank_ignores_case_and_surrounding_space() {
        let key = "compilation";
        let alts = strings(&["compiling", "compile"]);
        assert!(is_fill_blank_correct("  Compilation\t", key, &alts));
        assert!(is_fill_blank_correct("COMPILE", key, &alts));
        assert!(!is_fill_blank_correct("compil", key, &alts));
        assert!(!is_fill_blank_correct("com pilation", key, &alts));
    }

    #[test]
    fn grade_rejects_answer_of_wrong_kind() {
        let question = Question::single_choice("Capital", ["Paris", "Rome"], "Paris", 10).unwrap();
        assert!(grade(&question, &Answer::Single("Paris".into())));
        assert!(!grade(&question, &Answer::Single("Rome".into())));
        assert!(!grade(&question, &Answer::Text("Paris".into())));
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(15, 15), 100);
        assert_eq!(percentage(0, 70), 0);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(5, 0), 0);
    }
}
