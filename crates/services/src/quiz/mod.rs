pub mod bank;
mod engine;
mod intent;
mod progress;
mod runner;
mod snapshot;

// Public API of the quiz subsystem.
pub use crate::error::{QuizError, RunnerError};
pub use bank::{LoadedQuiz, QuizDefinition, builtin_definition, load_definition, parse_definition};
pub use engine::{AdvanceTicket, QuizEngine, QuizPhase};
pub use intent::{Intent, Transition};
pub use progress::QuizProgress;
pub use runner::{QuizHandle, QuizRunner};
pub use snapshot::QuizSnapshot;
