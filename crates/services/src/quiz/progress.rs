/// Aggregated view of quiz progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: usize,
    /// Questions with a lock record (answered or timed out).
    pub resolved: usize,
    pub unresolved: usize,
    pub is_complete: bool,
}
