use crate::error::GradingError;
use crate::guard::AssignmentRef;
use crate::submission::{NewSubmission, Submission};
use async_trait::async_trait;

/// Persistence contract for submissions.
///
/// `create` and `update` together form the upsert. Implementations must enforce
/// a single record per `(assignment, student)` and reject an `update` whose
/// `version` is no longer current, both as [`GradingError::ConflictingWrite`].
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn get_by_id(&self, id: i64) -> Result<Option<Submission>, GradingError>;

    async fn get_by_assignment_and_student(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>, GradingError>;

    async fn list_by_assignment(&self, assignment_id: i64)
        -> Result<Vec<Submission>, GradingError>;

    async fn list_by_student(&self, student_id: i64) -> Result<Vec<Submission>, GradingError>;

    async fn create(&self, new: NewSubmission) -> Result<Submission, GradingError>;

    /// Persists `submission` and returns it with the store's new version.
    async fn update(&self, submission: Submission) -> Result<Submission, GradingError>;
}

/// Lookup of assignment ownership, owned by the course side of the system.
#[async_trait]
pub trait AssignmentDirectory: Send + Sync {
    async fn find_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Option<AssignmentRef>, GradingError>;
}
