use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("choice questions need at least one option")]
    NoOptions,

    #[error("option text cannot be empty")]
    EmptyOption,

    #[error("option listed twice: {0}")]
    DuplicateOption(String),

    #[error("correct answer `{0}` is not one of the options")]
    AnswerNotInOptions(String),

    #[error("multi-choice questions need at least one correct option")]
    EmptyCorrectSet,

    #[error("correct option listed twice: {0}")]
    DuplicateCorrectOption(String),

    #[error("fill-blank answer cannot be empty")]
    EmptyCorrectText,

    #[error("acceptable alternatives cannot be empty")]
    EmptyAlternative,

    #[error("points must be > 0")]
    InvalidPoints,
}

//
// ─── UNVALIDATED FORM ──────────────────────────────────────────────────────────
//

/// Question as written in a quiz definition, before validation.
///
/// The `type` tag selects the kind. The legacy tags `multiple-choice` and
/// `multiple-select` are accepted for single- and multi-choice questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QuestionSpec {
    #[serde(alias = "multiple-choice")]
    SingleChoice {
        #[serde(alias = "question")]
        prompt: String,
        options: Vec<String>,
        correct: String,
        points: u32,
    },
    #[serde(alias = "multiple-select")]
    MultiChoice {
        #[serde(alias = "question")]
        prompt: String,
        options: Vec<String>,
        correct: Vec<String>,
        points: u32,
    },
    FillBlank {
        #[serde(alias = "question")]
        prompt: String,
        correct: String,
        #[serde(default)]
        alternatives: Vec<String>,
        points: u32,
    },
}

impl QuestionSpec {
    /// Validate the raw question and turn it into an immutable [`Question`].
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the prompt is blank, options are empty or
    /// repeated, a correct answer is not drawn from the options, or `points`
    /// is zero.
    pub fn validate(self) -> Result<Question, QuestionError> {
        match self {
            Self::SingleChoice {
                prompt,
                options,
                correct,
                points,
            } => {
                check_prompt(&prompt)?;
                check_points(points)?;
                check_options(&options)?;
                if !options.contains(&correct) {
                    return Err(QuestionError::AnswerNotInOptions(correct));
                }
                Ok(Question {
                    prompt,
                    points,
                    kind: QuestionKind::SingleChoice { options, correct },
                })
            }
            Self::MultiChoice {
                prompt,
                options,
                correct,
                points,
            } => {
                check_prompt(&prompt)?;
                check_points(points)?;
                check_options(&options)?;
                if correct.is_empty() {
                    return Err(QuestionError::EmptyCorrectSet);
                }
                let mut seen = HashSet::new();
                for option in &correct {
                    if !options.contains(option) {
                        return Err(QuestionError::AnswerNotInOptions(option.clone()));
                    }
                    if !seen.insert(option.as_str()) {
                        return Err(QuestionError::DuplicateCorrectOption(option.clone()));
                    }
                }
                Ok(Question {
                    prompt,
                    points,
                    kind: QuestionKind::MultiChoice { options, correct },
                })
            }
            Self::FillBlank {
                prompt,
                correct,
                alternatives,
                points,
            } => {
                check_prompt(&prompt)?;
                check_points(points)?;
                if correct.trim().is_empty() {
                    return Err(QuestionError::EmptyCorrectText);
                }
                if alternatives.iter().any(|alt| alt.trim().is_empty()) {
                    return Err(QuestionError::EmptyAlternative);
                }
                Ok(Question {
                    prompt,
                    points,
                    kind: QuestionKind::FillBlank {
                        correct,
                        alternatives,
                    },
                })
            }
        }
    }
}

fn check_prompt(prompt: &str) -> Result<(), QuestionError> {
    if prompt.trim().is_empty() {
        return Err(QuestionError::EmptyPrompt);
    }
    Ok(())
}

fn check_points(points: u32) -> Result<(), QuestionError> {
    if points == 0 {
        return Err(QuestionError::InvalidPoints);
    }
    Ok(())
}

fn check_options(options: &[String]) -> Result<(), QuestionError> {
    if options.is_empty() {
        return Err(QuestionError::NoOptions);
    }
    let mut seen = HashSet::new();
    for option in options {
        if option.trim().is_empty() {
            return Err(QuestionError::EmptyOption);
        }
        if !seen.insert(option.as_str()) {
            return Err(QuestionError::DuplicateOption(option.clone()));
        }
    }
    Ok(())
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Discriminant of [`QuestionKind`], handy for matching intents to questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    SingleChoice,
    MultiChoice,
    FillBlank,
}

/// Kind-specific payload. Each variant carries exactly the answer key its
/// kind needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    SingleChoice {
        options: Vec<String>,
        correct: String,
    },
    MultiChoice {
        options: Vec<String>,
        correct: Vec<String>,
    },
    FillBlank {
        correct: String,
        alternatives: Vec<String>,
    },
}

/// A validated quiz question. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    kind: QuestionKind,
    points: u32,
}

impl Question {
    /// # Errors
    ///
    /// See [`QuestionSpec::validate`].
    pub fn single_choice(
        prompt: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
        correct: impl Into<String>,
        points: u32,
    ) -> Result<Self, QuestionError> {
        QuestionSpec::SingleChoice {
            prompt: prompt.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct: correct.into(),
            points,
        }
        .validate()
    }

    /// # Errors
    ///
    /// See [`QuestionSpec::validate`].
    pub fn multi_choice(
        prompt: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
        correct: impl IntoIterator<Item = impl Into<String>>,
        points: u32,
    ) -> Result<Self, QuestionError> {
        QuestionSpec::MultiChoice {
            prompt: prompt.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct: correct.into_iter().map(Into::into).collect(),
            points,
        }
        .validate()
    }

    /// # Errors
    ///
    /// See [`QuestionSpec::validate`].
    pub fn fill_blank(
        prompt: impl Into<String>,
        correct: impl Into<String>,
        alternatives: impl IntoIterator<Item = impl Into<String>>,
        points: u32,
    ) -> Result<Self, QuestionError> {
        QuestionSpec::FillBlank {
            prompt: prompt.into(),
            correct: correct.into(),
            alternatives: alternatives.into_iter().map(Into::into).collect(),
            points,
        }
        .validate()
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    #[must_use]
    pub fn question_type(&self) -> QuestionType {
        match self.kind {
            QuestionKind::SingleChoice { .. } => QuestionType::SingleChoice,
            QuestionKind::MultiChoice { .. } => QuestionType::MultiChoice,
            QuestionKind::FillBlank { .. } => QuestionType::FillBlank,
        }
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    /// Options offered to the player. Empty for fill-blank questions.
    #[must_use]
    pub fn options(&self) -> &[String] {
        match &self.kind {
            QuestionKind::SingleChoice { options, .. }
            | QuestionKind::MultiChoice { options, .. } => options,
            QuestionKind::FillBlank { .. } => &[],
        }
    }

    #[must_use]
    pub fn has_option(&self, option: &str) -> bool {
        self.options().iter().any(|candidate| candidate == option)
    }

    /// Every accepted answer text: the single correct option, the correct
    /// set, or the fill-blank answer followed by its alternatives.
    #[must_use]
    pub fn answer_key(&self) -> Vec<&str> {
        match &self.kind {
            QuestionKind::SingleChoice { correct, .. } => vec![correct.as_str()],
            QuestionKind::MultiChoice { correct, .. } => {
                correct.iter().map(String::as_str).collect()
            }
            QuestionKind::FillBlank {
                correct,
                alternatives,
            } => std::iter::once(correct.as_str())
                .chain(alternatives.iter().map(String::as_str))
                .collect(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
