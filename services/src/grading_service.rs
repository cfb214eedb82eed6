//! Entry points for the grading lifecycle.
//!
//! Each operation checks the actor's role, loads what it needs, checks ownership,
//! validates input, applies one transition from [`crate::lifecycle`] and persists
//! the result with a single store write. Nothing is retried.

use crate::error::GradingError;
use crate::grade::GradeBounds;
use crate::guard::{self, Actor, AssignmentRef};
use crate::lifecycle;
use crate::store::{AssignmentDirectory, SubmissionStore};
use crate::submission::{FileRef, Submission, SubmissionStatus};
use crate::summary::GradingSummary;
use chrono::Utc;
use rust_decimal::Decimal;

pub struct GradingService<S> {
    store: S,
    bounds: GradeBounds,
}

fn log_outcome(
    operation: &str,
    actor: &Actor,
    result: Result<Submission, GradingError>,
) -> Result<Submission, GradingError> {
    match &result {
        Ok(submission) => log::info!(
            "{}: submission {} is now {:?} (user {} as {})",
            operation,
            submission.id,
            submission.status(),
            actor.user_id,
            actor.role
        ),
        Err(GradingError::Database(e)) => {
            log::error!("{} failed for user {}: {}", operation, actor.user_id, e)
        }
        Err(e) => log::warn!("{} rejected for user {}: {}", operation, actor.user_id, e),
    }
    result
}

impl<S> GradingService<S>
where
    S: SubmissionStore + AssignmentDirectory,
{
    pub fn new(store: S, bounds: GradeBounds) -> Self {
        Self { store, bounds }
    }

    /// Service using the configured `MAX_GRADE`.
    pub fn from_config(store: S) -> Self {
        Self::new(store, GradeBounds::from_config())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn bounds(&self) -> GradeBounds {
        self.bounds
    }

    /// Creates the actor's submission for `assignment_id`, or replaces the file of
    /// an existing one and resets it to pending.
    pub async fn submit_or_resubmit(
        &self,
        actor: &Actor,
        assignment_id: i64,
        file_ref: &str,
    ) -> Result<Submission, GradingError> {
        let result = self.submit(actor, assignment_id, file_ref).await;
        log_outcome("submit_or_resubmit", actor, result)
    }

    /// Records a grade that can still be changed.
    pub async fn save_temporary_score(
        &self,
        actor: &Actor,
        submission_id: i64,
        grade: Option<Decimal>,
        feedback: Option<String>,
    ) -> Result<Submission, GradingError> {
        let result = self.score(actor, submission_id, grade, feedback, false).await;
        log_outcome("save_temporary_score", actor, result)
    }

    /// Records a grade and locks the submission.
    pub async fn finalize_grading(
        &self,
        actor: &Actor,
        submission_id: i64,
        grade: Option<Decimal>,
        feedback: Option<String>,
    ) -> Result<Submission, GradingError> {
        let result = self.score(actor, submission_id, grade, feedback, true).await;
        log_outcome("finalize_grading", actor, result)
    }

    /// Unlocks a finalized submission, keeping its grade and feedback.
    pub async fn cancel_finalization(
        &self,
        actor: &Actor,
        submission_id: i64,
    ) -> Result<Submission, GradingError> {
        let result = self.reopen(actor, submission_id).await;
        log_outcome("cancel_finalization", actor, result)
    }

    pub async fn get_submission(&self, submission_id: i64) -> Result<Submission, GradingError> {
        self.store
            .get_by_id(submission_id)
            .await?
            .ok_or_else(|| GradingError::NotFound(format!("submission {submission_id}")))
    }

    pub async fn list_submissions_for_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<Submission>, GradingError> {
        self.store.list_by_assignment(assignment_id).await
    }

    pub async fn list_submissions_for_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<Submission>, GradingError> {
        self.store.list_by_student(student_id).await
    }

    /// Whether a submit by `student_id` would currently be accepted.
    pub async fn can_resubmit(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<bool, GradingError> {
        let existing = self
            .store
            .get_by_assignment_and_student(assignment_id, student_id)
            .await?;
        Ok(!existing.is_some_and(|s| s.is_finalized()))
    }

    pub async fn can_modify_grade(&self, submission_id: i64) -> Result<bool, GradingError> {
        Ok(!self.get_submission(submission_id).await?.is_finalized())
    }

    pub async fn status_of(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<SubmissionStatus, GradingError> {
        let existing = self
            .store
            .get_by_assignment_and_student(assignment_id, student_id)
            .await?;
        Ok(existing.map_or(SubmissionStatus::Unsubmitted, |s| s.status()))
    }

    pub async fn grading_summary(&self, assignment_id: i64) -> Result<GradingSummary, GradingError> {
        self.assignment(assignment_id).await?;
        let submissions = self.store.list_by_assignment(assignment_id).await?;
        Ok(GradingSummary::from_submissions(assignment_id, &submissions))
    }

    async fn assignment(&self, assignment_id: i64) -> Result<AssignmentRef, GradingError> {
        self.store
            .find_assignment(assignment_id)
            .await?
            .ok_or_else(|| GradingError::NotFound(format!("assignment {assignment_id}")))
    }

    async fn submit(
        &self,
        actor: &Actor,
        assignment_id: i64,
        file_ref: &str,
    ) -> Result<Submission, GradingError> {
        guard::require_student(actor)?;
        let file_ref = FileRef::new(file_ref)?;
        self.assignment(assignment_id).await?;

        let now = Utc::now();
        let existing = self
            .store
            .get_by_assignment_and_student(assignment_id, actor.user_id)
            .await?;

        match existing {
            None => {
                let new = lifecycle::submit(assignment_id, actor.user_id, file_ref, now);
                self.store.create(new).await
            }
            Some(current) => {
                guard::authorize_resubmit(actor, &current)?;
                let next = lifecycle::resubmit(&current, file_ref, now)?;
                self.store.update(next).await
            }
        }
    }

    /// Loads a submission the actor is allowed to grade.
    async fn load_for_grading(
        &self,
        actor: &Actor,
        submission_id: i64,
    ) -> Result<Submission, GradingError> {
        guard::require_grader(actor)?;
        let current = self.get_submission(submission_id).await?;
        let assignment = self.assignment(current.assignment_id).await?;
        guard::authorize_grading(actor, &assignment)?;
        Ok(current)
    }

    async fn score(
        &self,
        actor: &Actor,
        submission_id: i64,
        grade: Option<Decimal>,
        feedback: Option<String>,
        finalize: bool,
    ) -> Result<Submission, GradingError> {
        let current = self.load_for_grading(actor, submission_id).await?;
        let grade = self.bounds.check(grade)?;

        let next = if finalize {
            lifecycle::finalize(&current, grade, feedback, Utc::now())?
        } else {
            lifecycle::save_score(&current, grade, feedback)?
        };
        self.store.update(next).await
    }

    async fn reopen(&self, actor: &Actor, submission_id: i64) -> Result<Submission, GradingError> {
        let current = self.load_for_grading(actor, submission_id).await?;
        let next = lifecycle::unfinalize(&current)?;
        self.store.update(next).await
    }
}
