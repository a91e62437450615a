use thiserror::Error;

use super::question::{Question, QuestionError, QuestionSpec};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionSetError {
    #[error("quiz must contain at least one question")]
    Empty,

    #[error("question {index} is invalid: {source}")]
    InvalidQuestion {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

/// The fixed, ordered question sequence of a quiz.
///
/// Always non-empty. Total points are computed once when the set is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSet {
    questions: Vec<Question>,
    total_points: u32,
}

impl QuestionSet {
    /// # Errors
    ///
    /// Returns `QuestionSetError::Empty` if `questions` is empty.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionSetError> {
        if questions.is_empty() {
            return Err(QuestionSetError::Empty);
        }
        let total_points = questions
            .iter()
            .fold(0_u32, |acc, q| acc.saturating_add(q.points()));
        Ok(Self {
            questions,
            total_points,
        })
    }

    /// Validate every raw question, reporting the first failure with its position.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSetError::Empty` for an empty list and
    /// `QuestionSetError::InvalidQuestion` for the first question that fails.
    pub fn from_specs(specs: Vec<QuestionSpec>) -> Result<Self, QuestionSetError> {
        let questions = specs
            .into_iter()
            .enumerate()
            .map(|(index, spec)| {
                spec.validate()
                    .map_err(|source| QuestionSetError::InvalidQuestion { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(questions)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn last_index(&self) -> usize {
        self.questions.len().saturating_sub(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    #[must_use]
    pub fn total_points(&self) -> u32 {
        self.total_points
    }
}
