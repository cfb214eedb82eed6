//! SeaORM-backed [`SubmissionStore`] and [`AssignmentDirectory`].

use crate::error::GradingError;
use crate::grade::Grade;
use crate::guard::AssignmentRef;
use crate::store::{AssignmentDirectory, SubmissionStore};
use crate::submission::{FileRef, GradingState, NewSubmission, Submission};
use async_trait::async_trait;
use db::models::submission;
use db::repositories::assignment_repository::AssignmentRepository;
use db::repositories::submission_repository::SubmissionRepository;
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::{ConnectionTrait, DbErr, SqlErr};

/// Store over any SeaORM connection, including a caller-owned transaction.
pub struct SeaOrmStore<'c, C> {
    db: &'c C,
}

impl<'c, C> SeaOrmStore<'c, C>
where
    C: ConnectionTrait,
{
    pub fn new(db: &'c C) -> Self {
        Self { db }
    }
}

impl<C> Clone for SeaOrmStore<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for SeaOrmStore<'_, C> {}

fn map_write_err(err: DbErr, what: String) -> GradingError {
    match err {
        DbErr::RecordNotUpdated => {
            log::warn!("Stale write rejected for {}", what);
            GradingError::ConflictingWrite(format!("{what} was modified concurrently"))
        }
        err if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            log::warn!("Duplicate submission rejected for {}", what);
            GradingError::ConflictingWrite(format!("{what} already exists"))
        }
        err => GradingError::Database(err),
    }
}

impl TryFrom<submission::Model> for Submission {
    type Error = GradingError;

    fn try_from(row: submission::Model) -> Result<Self, Self::Error> {
        let file_ref = FileRef::new(row.file_ref)
            .map_err(|_| GradingError::inconsistent_row(row.id, "empty file_ref"))?;

        let grade = match row.grade_hundredths {
            Some(h) => Some(
                Grade::from_hundredths(h)
                    .ok_or_else(|| GradingError::inconsistent_row(row.id, "negative grade"))?,
            ),
            None => None,
        };

        let state = match (row.is_finalized, row.finalized_at, grade) {
            (true, Some(finalized_at), Some(grade)) => GradingState::Finalized {
                grade,
                feedback: row.feedback,
                finalized_at,
            },
            (false, None, Some(grade)) => GradingState::Scored {
                grade,
                feedback: row.feedback,
            },
            (false, None, None) if row.feedback.is_none() => GradingState::Pending,
            (false, None, None) => {
                return Err(GradingError::inconsistent_row(row.id, "feedback without grade"));
            }
            (true, _, None) => {
                return Err(GradingError::inconsistent_row(row.id, "finalized without grade"));
            }
            _ => {
                return Err(GradingError::inconsistent_row(
                    row.id,
                    "is_finalized disagrees with finalized_at",
                ));
            }
        };

        Ok(Submission {
            id: row.id,
            assignment_id: row.assignment_id,
            student_id: row.student_id,
            file_ref,
            submitted_at: row.submitted_at,
            state,
            version: row.version,
        })
    }
}

fn into_submissions(rows: Vec<submission::Model>) -> Result<Vec<Submission>, GradingError> {
    rows.into_iter().map(Submission::try_from).collect()
}

#[async_trait]
impl<'c, C> SubmissionStore for SeaOrmStore<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn get_by_id(&self, id: i64) -> Result<Option<Submission>, GradingError> {
        SubmissionRepository::find_by_id(self.db, id)
            .await?
            .map(Submission::try_from)
            .transpose()
    }

    async fn get_by_assignment_and_student(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>, GradingError> {
        SubmissionRepository::find_by_assignment_and_student(self.db, assignment_id, student_id)
            .await?
            .map(Submission::try_from)
            .transpose()
    }

    async fn list_by_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<Submission>, GradingError> {
        into_submissions(SubmissionRepository::list_by_assignment(self.db, assignment_id).await?)
    }

    async fn list_by_student(&self, student_id: i64) -> Result<Vec<Submission>, GradingError> {
        into_submissions(SubmissionRepository::list_by_student(self.db, student_id).await?)
    }

    async fn create(&self, new: NewSubmission) -> Result<Submission, GradingError> {
        let now = chrono::Utc::now();
        let active = submission::ActiveModel {
            assignment_id: Set(new.assignment_id),
            student_id: Set(new.student_id),
            file_ref: Set(new.file_ref.into_inner()),
            submitted_at: Set(new.submitted_at),
            grade_hundredths: Set(None),
            feedback: Set(None),
            is_finalized: Set(false),
            finalized_at: Set(None),
            version: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let row = SubmissionRepository::insert(self.db, active)
            .await
            .map_err(|e| {
                map_write_err(
                    e,
                    format!(
                        "submission for assignment {} by student {}",
                        new.assignment_id, new.student_id
                    ),
                )
            })?;
        Submission::try_from(row)
    }

    async fn update(&self, submission: Submission) -> Result<Submission, GradingError> {
        let id = submission.id;
        let active = submission::ActiveModel {
            id: Unchanged(id),
            file_ref: Set(submission.file_ref.into_inner()),
            submitted_at: Set(submission.submitted_at),
            grade_hundredths: Set(submission.state.grade().map(Grade::to_hundredths)),
            feedback: Set(submission.state.feedback().map(str::to_owned)),
            is_finalized: Set(submission.state.is_finalized()),
            finalized_at: Set(submission.state.finalized_at()),
            ..Default::default()
        };

        let row = SubmissionRepository::update_versioned(self.db, active, submission.version)
            .await
            .map_err(|e| map_write_err(e, format!("submission {id}")))?;
        Submission::try_from(row)
    }
}

#[async_trait]
impl<'c, C> AssignmentDirectory for SeaOrmStore<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Option<AssignmentRef>, GradingError> {
        let found = AssignmentRepository::find_with_course(self.db, assignment_id).await?;

        Ok(found.map(|(assignment, course)| AssignmentRef {
            id: assignment.id,
            course_id: course.id,
            professor_id: course.professor_id,
        }))
    }
}
