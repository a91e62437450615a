use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grading::percentage;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("score ({score}) exceeds total points ({total})")]
    ScoreExceedsTotal { score: u32, total: u32 },

    #[error("total points must be > 0")]
    ZeroTotalPoints,
}

//
// ─── TIER ──────────────────────────────────────────────────────────────────────
//

/// Performance bucket derived from the final percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    /// 80% and above.
    Excellent,
    /// 60% up to 79%.
    Good,
    /// 40% up to 59%.
    Fair,
    /// Below 40%.
    NeedsImprovement,
}

impl Tier {
    #[must_use]
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            80.. => Self::Excellent,
            60..=79 => Self::Good,
            40..=59 => Self::Fair,
            _ => Self::NeedsImprovement,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::NeedsImprovement => "Needs Improvement",
        }
    }
}

//
// ─── OUTCOME ───────────────────────────────────────────────────────────────────
//

/// Per-question result as shown on the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionOutcome {
    Correct,
    Incorrect,
    TimedOut,
    /// Skipped or never reached.
    Unanswered,
}

//
// ─── SUMMARY ───────────────────────────────────────────────────────────────────
//

/// Aggregate result of a finished quiz session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSummary {
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    score: u32,
    total_points: u32,
    percentage: u32,
    tier: Tier,
    outcomes: Vec<QuestionOutcome>,
}

impl QuizSummary {
    /// Build a summary from per-question outcomes.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::InvalidTimeRange` if `completed_at` is before `started_at`.
    /// Returns `SummaryError::ZeroTotalPoints` if `total_points` is zero.
    /// Returns `SummaryError::ScoreExceedsTotal` if `score > total_points`.
    pub fn from_outcomes(
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        score: u32,
        total_points: u32,
        outcomes: Vec<QuestionOutcome>,
    ) -> Result<Self, SummaryError> {
        if completed_at < started_at {
            return Err(SummaryError::InvalidTimeRange);
        }
        if total_points == 0 {
            return Err(SummaryError::ZeroTotalPoints);
        }
        if score > total_points {
            return Err(SummaryError::ScoreExceedsTotal {
                score,
                total: total_points,
            });
        }

        let percentage = percentage(score, total_points);
        Ok(Self {
            started_at,
            completed_at,
            score,
            total_points,
            percentage,
            tier: Tier::from_percentage(percentage),
            outcomes,
        })
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.completed_at - self.started_at
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total_points(&self) -> u32 {
        self.total_points
    }

    #[must_use]
    pub fn percentage(&self) -> u32 {
        self.percentage
    }

    #[must_use]
    pub fn tier(&self) -> Tier {
        self.tier
    }

    #[must_use]
    pub fn outcomes(&self) -> &[QuestionOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.count(QuestionOutcome::Correct)
    }

    /// Everything that is not correct, including timeouts and skips.
    #[must_use]
    pub fn incorrect_count(&self) -> usize {
        self.outcomes.len() - self.correct_count()
    }

    #[must_use]
    pub fn timed_out_count(&self) -> usize {
        self.count(QuestionOutcome::TimedOut)
    }

    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.count(QuestionOutcome::Unanswered)
    }

    fn count(&self, outcome: QuestionOutcome) -> usize {
        self.outcomes.iter().filter(|o| **o == outcome).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn tier_boundaries() {
        assert_eq!(Tier::from_percentage(100), Tier::Excellent);
        assert_eq!(Tier::from_percentage(80), Tier::Excellent);
        assert_eq!(Tier::from_percentage(79), Tier::Good);
        assert_eq!(Tier::from_percentage(60), Tier::Good);
        assert_eq!(Tier::from_percentage(59), Tier::Fair);
        assert_eq!(Tier::from_percentage(40), Tier::Fair);
        assert_eq!(Tier::from_percentage(39), Tier::NeedsImprovement);
        assert_eq!(Tier::NeedsImprovement.label(), "Needs Improvement");
    }

    #[test]
    fn summary_counts_outcomes() {
        let now = fixed_now();
        let summary = QuizSummary::from_outcomes(
            now,
            now + Duration::seconds(42),
            25,
            70,
            vec![
                QuestionOutcome::Correct,
                QuestionOutcome::Incorrect,
                QuestionOutcome::TimedOut,
                QuestionOutcome::Unanswered,
                QuestionOutcome::Correct,
            ],
        )
        .unwrap();

        assert_eq!(summary.percentage(), 36);
        assert_eq!(summary.tier(), Tier::NeedsImprovement);
        assert_eq!(summary.correct_count(), 2);
        assert_eq!(summary.incorrect_count(), 3);
        assert_eq!(summary.timed_out_count(), 1);
        assert_eq!(summary.unanswered_count(), 1);
        assert_eq!(summary.duration(), Duration::seconds(42));
    }

    #[test]
    fn summary_rejects_inconsistent_inputs() {
        let now = fixed_now();
        assert_eq!(
            QuizSummary::from_outcomes(now, now - Duration::seconds(1), 0, 10, Vec::new())
                .unwrap_err(),
            SummaryError::InvalidTimeRange
        );
        assert_eq!(
            QuizSummary::from_outcomes(now, now, 11, 10, Vec::new()).unwrap_err(),
            SummaryError::ScoreExceedsTotal {
                score: 11,
                total: 10
            }
        );
        assert_eq!(
            QuizSummary::from_outcomes(now, now, 0, 0, Vec::new()).unwrap_err(),
            SummaryError::ZeroTotalPoints
        );
    }
}
