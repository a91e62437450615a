//! Shared error types for the services crate.

use std::path::PathBuf;

use quiz_core::model::{QuestionSetError, SettingsError};
use thiserror::Error;

/// Errors raised while configuring a quiz.
///
/// Once an engine exists, intents never fail; they are applied or ignored.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("invalid quiz configuration: {0}")]
    InvalidConfiguration(#[from] QuestionSetError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("failed to parse quiz definition: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read quiz definition {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors emitted by `QuizHandle`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum RunnerError {
    #[error("quiz runner has stopped")]
    Closed,
}
