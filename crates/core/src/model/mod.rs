mod answer;
mod question;
mod question_set;
mod settings;
mod summary;

pub use answer::{Answer, Draft, LockReason, LockRecord};
pub use question::{Question, QuestionError, QuestionKind, QuestionSpec, QuestionType};
pub use question_set::{QuestionSet, QuestionSetError};
pub use settings::{
    DEFAULT_FEEDBACK_DELAY_MS, DEFAULT_SECONDS_PER_QUESTION, QuizSettings, SettingsError,
};
pub use summary::{QuestionOutcome, QuizSummary, SummaryError, Tier};
