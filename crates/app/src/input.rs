use quiz_core::model::QuestionType;
use services::{Intent, QuizPhase, QuizSnapshot};

/// What a line typed by the player means in the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Intent(Intent),
    Help,
    Quit,
    Unknown(String),
}

/// Map one input line to a command.
///
/// Control words start with `:`. A bare number picks (single-choice) or
/// toggles (multi-choice) that option; any other text becomes the fill-blank
/// draft.
#[must_use]
pub fn parse_line(line: &str, snapshot: &QuizSnapshot) -> Command {
    let trimmed = line.trim();
    if let Some(word) = trimmed.strip_prefix(':') {
        return match word.trim().to_ascii_lowercase().as_str() {
            "start" | "s" | "retake" => Command::Intent(Intent::Start),
            "submit" | "ok" => submit_for(snapshot),
            "skip" => Command::Intent(Intent::Skip),
            "next" | "n" => Command::Intent(Intent::GoToNext),
            "prev" | "p" => Command::Intent(Intent::GoToPrevious),
            "finish" => Command::Intent(Intent::FinishNow),
            "help" | "h" | "?" => Command::Help,
            "quit" | "q" => Command::Quit,
            _ => Command::Unknown(trimmed.to_string()),
        };
    }

    if snapshot.phase != QuizPhase::Playing {
        return if trimmed.is_empty() {
            Command::Intent(Intent::Start)
        } else {
            Command::Unknown(trimmed.to_string())
        };
    }

    let Some(question) = &snapshot.question else {
        return Command::Unknown(trimmed.to_string());
    };

    match question.question_type() {
        QuestionType::SingleChoice | QuestionType::MultiChoice => {
            let Some(option) = trimmed
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| question.options().get(i))
            else {
                return Command::Unknown(trimmed.to_string());
            };
            if question.question_type() == QuestionType::SingleChoice {
                Command::Intent(Intent::SelectSingleChoice(option.clone()))
            } else {
                Command::Intent(Intent::ToggleMultiSelectOption(option.clone()))
            }
        }
        // Keep the raw line; the engine trims when grading.
        QuestionType::FillBlank => Command::Intent(Intent::SetFillBlankText(line.to_string())),
    }
}

fn submit_for(snapshot: &QuizSnapshot) -> Command {
    match snapshot.question.as_ref().map(|q| q.question_type()) {
        Some(QuestionType::MultiChoice) => Command::Intent(Intent::SubmitMultiSelect),
        Some(QuestionType::FillBlank) => Command::Intent(Intent::SubmitFillBlank),
        _ => Command::Unknown(":submit".to_string()),
    }
}
