use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_SECONDS_PER_QUESTION: u32 = 15;
pub const DEFAULT_FEEDBACK_DELAY_MS: u64 = 2_000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("seconds per question must be between 1 and 3600")]
    InvalidSecondsPerQuestion,

    #[error("feedback delay must be at most 60000 ms")]
    InvalidFeedbackDelay,
}

/// Timing knobs of a quiz session.
///
/// - `seconds_per_question`: countdown budget, restarted whenever a question is entered
/// - `feedback_delay_ms`: pause between locking an answer and auto-advancing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSettings", into = "RawSettings")]
pub struct QuizSettings {
    seconds_per_question: u32,
    feedback_delay_ms: u64,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            seconds_per_question: DEFAULT_SECONDS_PER_QUESTION,
            feedback_delay_ms: DEFAULT_FEEDBACK_DELAY_MS,
        }
    }
}

impl QuizSettings {
    /// # Errors
    ///
    /// Returns `SettingsError` when a value is out of range.
    pub fn new(seconds_per_question: u32, feedback_delay_ms: u64) -> Result<Self, SettingsError> {
        if !(1..=3600).contains(&seconds_per_question) {
            return Err(SettingsError::InvalidSecondsPerQuestion);
        }
        if feedback_delay_ms > 60_000 {
            return Err(SettingsError::InvalidFeedbackDelay);
        }
        Ok(Self {
            seconds_per_question,
            feedback_delay_ms,
        })
    }

    /// Same settings with a different countdown budget.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidSecondsPerQuestion` when out of range.
    pub fn with_seconds_per_question(self, seconds: u32) -> Result<Self, SettingsError> {
        Self::new(seconds, self.feedback_delay_ms)
    }

    #[must_use]
    pub fn seconds_per_question(&self) -> u32 {
        self.seconds_per_question
    }

    #[must_use]
    pub fn feedback_delay_ms(&self) -> u64 {
        self.feedback_delay_ms
    }

    #[must_use]
    pub fn feedback_delay(&self) -> Duration {
        Duration::from_millis(self.feedback_delay_ms)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawSettings {
    #[serde(default = "default_seconds")]
    seconds_per_question: u32,
    #[serde(default = "default_delay")]
    feedback_delay_ms: u64,
}

fn default_seconds() -> u32 {
    DEFAULT_SECONDS_PER_QUESTION
}

fn default_delay() -> u64 {
    DEFAULT_FEEDBACK_DELAY_MS
}

impl TryFrom<RawSettings> for QuizSettings {
    type Error = SettingsError;

    fn try_from(raw: RawSettings) -> Result<Self, Self::Error> {
        Self::new(raw.seconds_per_question, raw.feedback_delay_ms)
    }
}

impl From<QuizSettings> for RawSettings {
    fn from(settings: QuizSettings) -> Self {
        Self {
            seconds_per_question: settings.seconds_per_question,
            feedback_delay_ms: settings.feedback_delay_ms,
        }
    }
}
