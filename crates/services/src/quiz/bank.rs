use std::path::Path;

use quiz_core::Clock;
use quiz_core::model::{QuestionSet, QuestionSpec, QuizSettings};
use serde::{Deserialize, Serialize};

use super::engine::QuizEngine;
use crate::error::QuizError;

/// Quiz definition as stored in a JSON file.
///
/// ```json
/// {
///   "title": "General knowledge",
///   "settings": { "seconds_per_question": 15, "feedback_delay_ms": 2000 },
///   "questions": [
///     { "type": "single-choice", "prompt": "...", "options": ["..."], "correct": "...", "points": 10 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizDefinition {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub settings: QuizSettings,
    pub questions: Vec<QuestionSpec>,
}

fn default_title() -> String {
    "Quiz".to_string()
}

/// A definition that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedQuiz {
    pub title: String,
    pub settings: QuizSettings,
    pub questions: QuestionSet,
}

impl QuizDefinition {
    /// # Errors
    ///
    /// Returns `QuizError::InvalidConfiguration` if the question set is empty or
    /// any question is invalid.
    pub fn validate(self) -> Result<LoadedQuiz, QuizError> {
        let questions = QuestionSet::from_specs(self.questions)?;
        Ok(LoadedQuiz {
            title: self.title,
            settings: self.settings,
            questions,
        })
    }
}

impl LoadedQuiz {
    #[must_use]
    pub fn into_engine(self, clock: Clock) -> QuizEngine {
        QuizEngine::new(self.questions, self.settings, clock)
    }
}

/// Parse and validate a JSON quiz definition.
///
/// # Errors
///
/// Returns `QuizError::Parse` for malformed JSON (including out-of-range
/// settings) and `QuizError::InvalidConfiguration` for invalid questions.
pub fn parse_definition(json: &str) -> Result<LoadedQuiz, QuizError> {
    let definition: QuizDefinition = serde_json::from_str(json)?;
    definition.validate()
}

/// Read, parse and validate a JSON quiz definition from disk.
///
/// # Errors
///
/// Returns `QuizError::Io` if the file cannot be read, otherwise see
/// [`parse_definition`].
pub fn load_definition(path: &Path) -> Result<LoadedQuiz, QuizError> {
    let raw = std::fs::read_to_string(path).map_err(|source| QuizError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = raw.len(), "quiz definition read");
    parse_definition(&raw)
}

/// The default six-question general knowledge quiz.
#[must_use]
pub fn builtin_definition() -> QuizDefinition {
    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    QuizDefinition {
        title: "Tech Trivia".to_string(),
        settings: QuizSettings::default(),
        questions: vec![
            QuestionSpec::SingleChoice {
                prompt: "What is the capital of France?".into(),
                options: strings(&["London", "Berlin", "Paris", "Madrid"]),
                correct: "Paris".into(),
                points: 10,
            },
            QuestionSpec::MultiChoice {
                prompt: "Which of these are programming languages?".into(),
                options: strings(&["Python", "HTML", "JavaScript", "CSS"]),
                correct: strings(&["Python", "JavaScript"]),
                points: 15,
            },
            QuestionSpec::FillBlank {
                prompt: "The process of converting code into machine language is called _____."
                    .into(),
                correct: "compilation".into(),
                alternatives: strings(&["compiling", "compile"]),
                points: 10,
            },
            QuestionSpec::SingleChoice {
                prompt: "What does CPU stand for?".into(),
                options: strings(&[
                    "Central Processing Unit",
                    "Computer Personal Unit",
                    "Central Program Utility",
                    "Core Processing Unit",
                ]),
                correct: "Central Processing Unit".into(),
                points: 10,
            },
            QuestionSpec::MultiChoice {
                prompt: "Select all web browsers from the list:".into(),
                options: strings(&["Chrome", "Excel", "Firefox", "PowerPoint", "Safari"]),
                correct: strings(&["Chrome", "Firefox", "Safari"]),
                points: 15,
            },
            QuestionSpec::FillBlank {
                prompt: "React is a JavaScript _____ for building user interfaces.".into(),
                correct: "library".into(),
                alternatives: strings(&["framework"]),
                points: 10,
            },
        ],
    }
}
