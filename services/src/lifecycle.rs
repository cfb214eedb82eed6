//! Pure grading transitions.
//!
//! Each function takes the current record by reference and returns the next one,
//! so a refused transition leaves nothing half-applied.

use crate::error::GradingError;
use crate::grade::Grade;
use crate::submission::{FileRef, GradingState, NewSubmission, Submission};
use chrono::{DateTime, Utc};

/// First submission for an `(assignment, student)` pair.
pub fn submit(
    assignment_id: i64,
    student_id: i64,
    file_ref: FileRef,
    now: DateTime<Utc>,
) -> NewSubmission {
    NewSubmission {
        assignment_id,
        student_id,
        file_ref,
        submitted_at: now,
    }
}

/// Replaces the artifact and drops any score.
pub fn resubmit(
    current: &Submission,
    file_ref: FileRef,
    now: DateTime<Utc>,
) -> Result<Submission, GradingError> {
    if current.is_finalized() {
        return Err(GradingError::AlreadyFinalized(current.id));
    }

    Ok(Submission {
        file_ref,
        submitted_at: now,
        state: GradingState::Pending,
        ..current.clone()
    })
}

pub fn save_score(
    current: &Submission,
    grade: Grade,
    feedback: Option<String>,
) -> Result<Submission, GradingError> {
    if current.is_finalized() {
        return Err(GradingError::AlreadyFinalized(current.id));
    }

    Ok(Submission {
        state: GradingState::Scored { grade, feedback },
        ..current.clone()
    })
}

/// Locks the grade. `finalized_at` never precedes `submitted_at`.
pub fn finalize(
    current: &Submission,
    grade: Grade,
    feedback: Option<String>,
    now: DateTime<Utc>,
) -> Result<Submission, GradingError> {
    if current.is_finalized() {
        return Err(GradingError::AlreadyFinalized(current.id));
    }

    Ok(Submission {
        state: GradingState::Finalized {
            grade,
            feedback,
            finalized_at: now.max(current.submitted_at),
        },
        ..current.clone()
    })
}

/// Reopens a finalized record, keeping its grade and feedback.
pub fn unfinalize(current: &Submission) -> Result<Submission, GradingError> {
    match &current.state {
        GradingState::Finalized {
            grade, feedback, ..
        } => Ok(Submission {
            state: GradingState::Scored {
                grade: *grade,
                feedback: feedback.clone(),
            },
            ..current.clone()
        }),
        _ => Err(GradingError::NotFinalized(current.id)),
    }
}
