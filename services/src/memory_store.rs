//! In-process store used by fast service tests and local tooling.
//!
//! Keeps the same uniqueness and version rules as the database-backed store.

use crate::error::GradingError;
use crate::guard::AssignmentRef;
use crate::store::{AssignmentDirectory, SubmissionStore};
use crate::submission::{GradingState, NewSubmission, Submission};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

#[derive(Default)]
struct Inner {
    next_id: i64,
    submissions: HashMap<i64, Submission>,
    assignments: HashMap<i64, AssignmentRef>,
}

#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an assignment so grading operations can resolve its owner.
    pub async fn add_assignment(&self, assignment: AssignmentRef) {
        self.inner
            .lock()
            .await
            .assignments
            .insert(assignment.id, assignment);
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.submissions.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn sorted_by<K: Ord>(mut items: Vec<Submission>, key: impl Fn(&Submission) -> K) -> Vec<Submission> {
    items.sort_by_key(key);
    items
}

#[async_trait]
impl SubmissionStore for InMemoryStore {
    async fn get_by_id(&self, id: i64) -> Result<Option<Submission>, GradingError> {
        Ok(self.inner.lock().await.submissions.get(&id).cloned())
    }

    async fn get_by_assignment_and_student(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>, GradingError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .submissions
            .values()
            .find(|s| s.assignment_id == assignment_id && s.student_id == student_id)
            .cloned())
    }

    async fn list_by_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<Submission>, GradingError> {
        let inner = self.inner.lock().await;
        let found = inner
            .submissions
            .values()
            .filter(|s| s.assignment_id == assignment_id)
            .cloned()
            .collect();
        Ok(sorted_by(found, |s| s.student_id))
    }

    async fn list_by_student(&self, student_id: i64) -> Result<Vec<Submission>, GradingError> {
        let inner = self.inner.lock().await;
        let found = inner
            .submissions
            .values()
            .filter(|s| s.student_id == student_id)
            .cloned()
            .collect();
        Ok(sorted_by(found, |s| s.assignment_id))
    }

    async fn create(&self, new: NewSubmission) -> Result<Submission, GradingError> {
        let mut inner = self.inner.lock().await;

        let duplicate = inner
            .submissions
            .values()
            .any(|s| s.assignment_id == new.assignment_id && s.student_id == new.student_id);
        if duplicate {
            return Err(GradingError::ConflictingWrite(format!(
                "submission for assignment {} by student {} already exists",
                new.assignment_id, new.student_id
            )));
        }

        inner.next_id += 1;
        let submission = Submission {
            id: inner.next_id,
            assignment_id: new.assignment_id,
            student_id: new.student_id,
            file_ref: new.file_ref,
            submitted_at: new.submitted_at,
            state: GradingState::Pending,
            version: 0,
        };
        inner.submissions.insert(submission.id, submission.clone());
        Ok(submission)
    }

    async fn update(&self, submission: Submission) -> Result<Submission, GradingError> {
        let mut inner = self.inner.lock().await;

        let stored = inner
            .submissions
            .get_mut(&submission.id)
            .filter(|stored| stored.version == submission.version)
            .ok_or_else(|| {
                GradingError::ConflictingWrite(format!(
                    "submission {} was modified concurrently",
                    submission.id
                ))
            })?;

        *stored = Submission {
            version: submission.version + 1,
            ..submission
        };
        Ok(stored.clone())
    }
}

#[async_trait]
impl AssignmentDirectory for InMemoryStore {
    async fn find_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Option<AssignmentRef>, GradingError> {
        Ok(self.inner.lock().await.assignments.get(&assignment_id).copied())
    }
}
