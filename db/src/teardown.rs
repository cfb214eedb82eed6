//! Explicit removal of assignments and courses together with their submissions.
//!
//! Foreign keys from `submissions` restrict deletes, so parents can only go once
//! their dependants are gone. Each call runs in a single transaction and deleting
//! something that no longer exists is a no-op.

use crate::models::{assignment, course};
use crate::repositories::assignment_repository::AssignmentRepository;
use crate::repositories::submission_repository::SubmissionRepository;
use crate::repository::Repository;
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, DbErr, TransactionTrait};

/// Row counts removed by a teardown call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TeardownReport {
    pub submissions: u64,
    pub assignments: u64,
    pub courses: u64,
}

/// Deletes an assignment and all submissions made against it.
pub async fn delete_assignment<C>(db: &C, assignment_id: i64) -> Result<TeardownReport, DbErr>
where
    C: TransactionTrait,
{
    let txn = db.begin().await?;
    let report = remove_assignment(&txn, assignment_id).await?;
    txn.commit().await?;

    log::info!(
        "Assignment {} torn down ({} submissions removed)",
        assignment_id,
        report.submissions
    );
    Ok(report)
}

/// Deletes a course, its assignments and every submission under them.
pub async fn delete_course<C>(db: &C, course_id: i64) -> Result<TeardownReport, DbErr>
where
    C: TransactionTrait,
{
    let txn = db.begin().await?;

    let mut report = TeardownReport::default();
    for assignment_id in AssignmentRepository::ids_for_course(&txn, course_id).await? {
        let removed = remove_assignment(&txn, assignment_id).await?;
        report.submissions += removed.submissions;
        report.assignments += removed.assignments;
    }
    report.courses = Repository::<course::Entity, course::Column>::delete(
        &txn,
        Condition::all().add(course::Column::Id.eq(course_id)),
    )
    .await?;

    txn.commit().await?;

    log::info!(
        "Course {} torn down ({} assignments, {} submissions removed)",
        course_id,
        report.assignments,
        report.submissions
    );
    Ok(report)
}

async fn remove_assignment<C>(db: &C, assignment_id: i64) -> Result<TeardownReport, DbErr>
where
    C: ConnectionTrait,
{
    let submissions = SubmissionRepository::delete_by_assignment(db, assignment_id).await?;
    let assignments = Repository::<assignment::Entity, assignment::Column>::delete(
        db,
        Condition::all().add(assignment::Column::Id.eq(assignment_id)),
    )
    .await?;

    Ok(TeardownReport {
        submissions,
        assignments,
        courses: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Assignment, Course, Submission};
    use crate::test_utils::{seed_course, seed_submission, seed_user, setup_test_db};
    use crate::models::user::Role;
    use sea_orm::{EntityTrait, PaginatorTrait};

    #[tokio::test]
    async fn test_delete_assignment_removes_submissions_first() {
        let db = setup_test_db().await;
        let professor = seed_user(&db, "prof", Role::Professor).await;
        let alice = seed_user(&db, "alice", Role::Student).await;
        let bob = seed_user(&db, "bob", Role::Student).await;
        let (_, a1) = seed_course(&db, "COS301", professor.id).await;
        seed_submission(&db, a1.id, alice.id, "alice.pdf").await;
        seed_submission(&db, a1.id, bob.id, "bob.pdf").await;

        let report = delete_assignment(&db, a1.id).await.unwrap();
        assert_eq!(report.submissions, 2);
        assert_eq!(report.assignments, 1);
        assert_eq!(Submission::find().count(&db).await.unwrap(), 0);
        assert!(Assignment::find_by_id(a1.id).one(&db).await.unwrap().is_none());

        let again = delete_assignment(&db, a1.id).await.unwrap();
        assert_eq!(again, TeardownReport::default());
    }

    #[tokio::test]
    async fn test_delete_course_cascades_through_assignments() {
        let db = setup_test_db().await;
        let professor = seed_user(&db, "prof", Role::Professor).await;
        let alice = seed_user(&db, "alice", Role::Student).await;
        let (course, a1) = seed_course(&db, "COS301", professor.id).await;
        let a2 = assignment::Model::create(&db, course.id, "A2", chrono::Utc::now())
            .await
            .unwrap();
        let (other_course, other) = seed_course(&db, "COS332", professor.id).await;
        seed_submission(&db, a1.id, alice.id, "a1.pdf").await;
        seed_submission(&db, a2.id, alice.id, "a2.pdf").await;
        seed_submission(&db, other.id, alice.id, "other.pdf").await;

        let report = delete_course(&db, course.id).await.unwrap();
        assert_eq!(
            report,
            TeardownReport {
                submissions: 2,
                assignments: 2,
                courses: 1,
            }
        );
        assert_eq!(Submission::find().count(&db).await.unwrap(), 1);
        assert!(Course::find_by_id(other_course.id).one(&db).await.unwrap().is_some());

        let again = delete_course(&db, course.id).await.unwrap();
        assert_eq!(again, TeardownReport::default());
    }

    #[tokio::test]
    async fn test_assignment_with_submissions_cannot_be_deleted_directly() {
        let db = setup_test_db().await;
        let professor = seed_user(&db, "prof", Role::Professor).await;
        let alice = seed_user(&db, "alice", Role::Student).await;
        let (_, a1) = seed_course(&db, "COS301", professor.id).await;
        seed_submission(&db, a1.id, alice.id, "alice.pdf").await;

        let result = Assignment::delete_by_id(a1.id).exec(&db).await;
        assert!(result.is_err());
        assert_eq!(Submission::find().count(&db).await.unwrap(), 1);
    }
}
