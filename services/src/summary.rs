use crate::submission::{Submission, SubmissionStatus};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Grading progress for one assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradingSummary {
    pub assignment_id: i64,
    pub total: usize,
    pub finalized: usize,
    pub scored_pending: usize,
    /// Submitted with no score yet.
    pub pending: usize,
    /// Everything not finalized.
    pub ungraded: usize,
    /// Mean of finalized grades to two decimals, `None` when nothing is finalized.
    pub average_finalized_grade: Option<Decimal>,
}

impl GradingSummary {
    pub fn from_submissions(assignment_id: i64, submissions: &[Submission]) -> Self {
        let count = |status: SubmissionStatus| {
            submissions.iter().filter(|s| s.status() == status).count()
        };

        let finalized_grades: Vec<Decimal> = submissions
            .iter()
            .filter(|s| s.is_finalized())
            .filter_map(|s| s.grade())
            .map(|g| g.value())
            .collect();

        let average_finalized_grade = (!finalized_grades.is_empty()).then(|| {
            let sum: Decimal = finalized_grades.iter().sum();
            (sum / Decimal::from(finalized_grades.len()))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        });

        let finalized = count(SubmissionStatus::Finalized);
        Self {
            assignment_id,
            total: submissions.len(),
            finalized,
            scored_pending: count(SubmissionStatus::ScoredPending),
            pending: count(SubmissionStatus::Pending),
            ungraded: submissions.len() - finalized,
            average_finalized_grade,
        }
    }
}
