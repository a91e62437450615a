/// User intents (and clock ticks) accepted by [`super::QuizEngine::dispatch`].
///
/// Intents that do not apply to the current state are ignored rather than
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Begin a session, or restart one from any phase.
    Start,
    SelectSingleChoice(String),
    ToggleMultiSelectOption(String),
    SubmitMultiSelect,
    SetFillBlankText(String),
    SubmitFillBlank,
    Skip,
    GoToPrevious,
    GoToNext,
    FinishNow,
    /// One second elapsed on the question clock.
    Tick,
}

/// Whether an intent changed engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    Ignored,
}

impl Transition {
    #[must_use]
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }

    pub(crate) fn from_applied(applied: bool) -> Self {
        if applied { Self::Applied } else { Self::Ignored }
    }
}
