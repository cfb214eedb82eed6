use crate::error::GradingError;
use crate::grade::Grade;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Opaque, non-empty reference to a submitted artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FileRef(String);

impl FileRef {
    pub fn new(raw: impl Into<String>) -> Result<Self, GradingError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(GradingError::InvalidInput(
                "file reference cannot be empty".to_string(),
            ));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Where a stored submission sits in grading.
///
/// A submission that was never made has no record at all; see
/// [`SubmissionStatus::Unsubmitted`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GradingState {
    /// Submitted, nothing scored yet.
    Pending,
    /// Scored but still editable.
    Scored {
        grade: Grade,
        feedback: Option<String>,
    },
    /// Locked until a grader cancels the finalization.
    Finalized {
        grade: Grade,
        feedback: Option<String>,
        finalized_at: DateTime<Utc>,
    },
}

impl GradingState {
    pub fn status(&self) -> SubmissionStatus {
        match self {
            GradingState::Pending => SubmissionStatus::Pending,
            GradingState::Scored { .. } => SubmissionStatus::ScoredPending,
            GradingState::Finalized { .. } => SubmissionStatus::Finalized,
        }
    }

    pub fn grade(&self) -> Option<Grade> {
        match self {
            GradingState::Pending => None,
            GradingState::Scored { grade, .. } | GradingState::Finalized { grade, .. } => {
                Some(*grade)
            }
        }
    }

    pub fn feedback(&self) -> Option<&str> {
        match self {
            GradingState::Pending => None,
            GradingState::Scored { feedback, .. } | GradingState::Finalized { feedback, .. } => {
                feedback.as_deref()
            }
        }
    }

    pub fn finalized_at(&self) -> Option<DateTime<Utc>> {
        match self {
            GradingState::Finalized { finalized_at, .. } => Some(*finalized_at),
            _ => None,
        }
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self, GradingState::Finalized { .. })
    }
}

/// Externally visible grading status for an `(assignment, student)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Unsubmitted,
    Pending,
    ScoredPending,
    Finalized,
}

/// A student's submission for one assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub file_ref: FileRef,
    pub submitted_at: DateTime<Utc>,
    pub state: GradingState,
    /// Optimistic lock counter as last read from the store.
    #[serde(skip)]
    pub version: i64,
}

impl Submission {
    pub fn status(&self) -> SubmissionStatus {
        self.state.status()
    }

    pub fn grade(&self) -> Option<Grade> {
        self.state.grade()
    }

    pub fn feedback(&self) -> Option<&str> {
        self.state.feedback()
    }

    pub fn is_finalized(&self) -> bool {
        self.state.is_finalized()
    }

    pub fn finalized_at(&self) -> Option<DateTime<Utc>> {
        self.state.finalized_at()
    }
}

/// A first submission, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
    pub assignment_id: i64,
    pub student_id: i64,
    pub file_ref: FileRef,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_ref_rejects_blank() {
        assert!(matches!(FileRef::new(""), Err(GradingError::InvalidInput(_))));
        assert!(matches!(FileRef::new("   "), Err(GradingError::InvalidInput(_))));
        assert_eq!(FileRef::new("r1.pdf").unwrap().as_str(), "r1.pdf");
    }

    #[test]
    fn state_accessors() {
        let grade = Grade::from_hundredths(7000).unwrap();
        let now = Utc::now();

        assert_eq!(GradingState::Pending.status(), SubmissionStatus::Pending);
        assert_eq!(GradingState::Pending.grade(), None);

        let scored = GradingState::Scored {
            grade,
            feedback: Some("ok".into()),
        };
        assert_eq!(scored.status(), SubmissionStatus::ScoredPending);
        assert_eq!(scored.feedback(), Some("ok"));
        assert!(!scored.is_finalized());

        let finalized = GradingState::Finalized {
            grade,
            feedback: None,
            finalized_at: now,
        };
        assert_eq!(finalized.status(), SubmissionStatus::Finalized);
        assert_eq!(finalized.grade(), Some(grade));
        assert_eq!(finalized.finalized_at(), Some(now));
    }
}
