#![forbid(unsafe_code)]

pub mod error;
pub mod quiz;

pub use quiz_core::Clock;

pub use error::{QuizError, RunnerError};
pub use quiz::{
    Intent, LoadedQuiz, QuizDefinition, QuizEngine, QuizHandle, QuizPhase, QuizProgress,
    QuizRunner, QuizSnapshot, Transition,
};
