use crate::models::submission::{ActiveModel, Column, Entity, Model};
use crate::repository::Repository;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter};

type Repo = Repository<Entity, Column>;

pub struct SubmissionRepository;

impl SubmissionRepository {
    pub async fn find_by_id<C>(db: &C, id: i64) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Repo::find_by_id(db, id).await
    }

    pub async fn find_by_assignment_and_student<C>(
        db: &C,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Repo::find_one(
            db,
            Condition::all()
                .add(Column::AssignmentId.eq(assignment_id))
                .add(Column::StudentId.eq(student_id)),
            None,
        )
        .await
    }

    /// All submissions for an assignment, ordered by student.
    pub async fn list_by_assignment<C>(db: &C, assignment_id: i64) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Repo::find_all(
            db,
            Condition::all().add(Column::AssignmentId.eq(assignment_id)),
            Some("student_id"),
        )
        .await
    }

    /// All submissions made by a student, ordered by assignment.
    pub async fn list_by_student<C>(db: &C, student_id: i64) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Repo::find_all(
            db,
            Condition::all().add(Column::StudentId.eq(student_id)),
            Some("assignment_id"),
        )
        .await
    }

    /// Inserts a new row. A second row for the same `(assignment, student)` pair
    /// fails with a unique-constraint violation from the database.
    pub async fn insert<C>(db: &C, active_model: ActiveModel) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        Repo::create(db, active_model).await
    }

    /// Writes the `Set` columns of `active` if the stored row still carries
    /// `expected_version`, bumping the version by one.
    ///
    /// `active.id` must be populated. Returns `DbErr::RecordNotUpdated` when the row
    /// is missing or another writer got there first.
    pub async fn update_versioned<C>(
        db: &C,
        mut active: ActiveModel,
        expected_version: i64,
    ) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        active.version = Set(expected_version + 1);
        active.updated_at = Set(Utc::now());

        Entity::update(active)
            .filter(Column::Version.eq(expected_version))
            .exec(db)
            .await
    }

    /// Removes every submission of an assignment. Safe to repeat.
    pub async fn delete_by_assignment<C>(db: &C, assignment_id: i64) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        Repo::delete(
            db,
            Condition::all().add(Column::AssignmentId.eq(assignment_id)),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{assignment, course, user, user::Role};
    use crate::test_utils::setup_test_db;
    use chrono::Duration;
    use sea_orm::ActiveValue::Unchanged;
    use sea_orm::{DatabaseConnection, SqlErr};

    async fn seed(db: &DatabaseConnection) -> (user::Model, assignment::Model) {
        let professor = user::Model::create(db, "prof", Role::Professor).await.unwrap();
        let student = user::Model::create(db, "stud", Role::Student).await.unwrap();
        let course = course::Model::create(db, "COS301", "Software Engineering", professor.id)
            .await
            .unwrap();
        let assignment =
            assignment::Model::create(db, course.id, "A1", Utc::now() + Duration::days(7))
                .await
                .unwrap();
        (student, assignment)
    }

    fn new_row(assignment_id: i64, student_id: i64, file_ref: &str) -> ActiveModel {
        let now = Utc::now();
        ActiveModel {
            assignment_id: Set(assignment_id),
            student_id: Set(student_id),
            file_ref: Set(file_ref.to_string()),
            submitted_at: Set(now),
            grade_hundredths: Set(None),
            feedback: Set(None),
            is_finalized: Set(false),
            finalized_at: Set(None),
            version: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_pair_is_unique() {
        let db = setup_test_db().await;
        let (student, assignment) = seed(&db).await;

        SubmissionRepository::insert(&db, new_row(assignment.id, student.id, "a.pdf"))
            .await
            .unwrap();
        let err = SubmissionRepository::insert(&db, new_row(assignment.id, student.id, "b.pdf"))
            .await
            .unwrap_err();

        assert!(matches!(
            err.sql_err(),
            Some(SqlErr::UniqueConstraintViolation(_))
        ));
        let all = SubmissionRepository::list_by_assignment(&db, assignment.id)
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].file_ref, "a.pdf");
    }

    #[tokio::test]
    async fn test_update_versioned_bumps_version() {
        let db = setup_test_db().await;
        let (student, assignment) = seed(&db).await;
        let row = SubmissionRepository::insert(&db, new_row(assignment.id, student.id, "a.pdf"))
            .await
            .unwrap();

        let changes = ActiveModel {
            id: Unchanged(row.id),
            grade_hundredths: Set(Some(8550)),
            feedback: Set(Some("ok".into())),
            ..Default::default()
        };
        let updated = SubmissionRepository::update_versioned(&db, changes, row.version)
            .await
            .unwrap();

        assert_eq!(updated.version, row.version + 1);
        assert_eq!(updated.grade_hundredths, Some(8550));
        assert_eq!(updated.feedback.as_deref(), Some("ok"));
        assert_eq!(updated.file_ref, "a.pdf");
    }

    #[tokio::test]
    async fn test_update_versioned_rejects_stale_version() {
        let db = setup_test_db().await;
        let (student, assignment) = seed(&db).await;
        let row = SubmissionRepository::insert(&db, new_row(assignment.id, student.id, "a.pdf"))
            .await
            .unwrap();

        let rename = |file_ref: &str| ActiveModel {
            id: Unchanged(row.id),
            file_ref: Set(file_ref.to_string()),
            ..Default::default()
        };
        SubmissionRepository::update_versioned(&db, rename("first.pdf"), row.version)
            .await
            .unwrap();

        let err = SubmissionRepository::update_versioned(&db, rename("second.pdf"), row.version)
            .await
            .unwrap_err();
        assert!(matches!(err, DbErr::RecordNotUpdated));

        let stored = SubmissionRepository::find_by_id(&db, row.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.file_ref, "first.pdf");
    }

    #[tokio::test]
    async fn test_lists_and_delete_by_assignment() {
        let db = setup_test_db().await;
        let (student, assignment) = seed(&db).await;
        let other = user::Model::create(&db, "stud2", Role::Student).await.unwrap();

        SubmissionRepository::insert(&db, new_row(assignment.id, other.id, "b.pdf"))
            .await
            .unwrap();
        SubmissionRepository::insert(&db, new_row(assignment.id, student.id, "a.pdf"))
            .await
            .unwrap();

        let by_assignment = SubmissionRepository::list_by_assignment(&db, assignment.id)
            .await
            .unwrap();
        assert_eq!(by_assignment.len(), 2);
        assert!(by_assignment[0].student_id < by_assignment[1].student_id);

        let by_student = SubmissionRepository::list_by_student(&db, student.id)
            .await
            .unwrap();
        assert_eq!(by_student.len(), 1);

        assert_eq!(
            SubmissionRepository::delete_by_assignment(&db, assignment.id)
                .await
                .unwrap(),
            2
        );
        assert_eq!(
            SubmissionRepository::delete_by_assignment(&db, assignment.id)
                .await
                .unwrap(),
            0
        );
    }
}
