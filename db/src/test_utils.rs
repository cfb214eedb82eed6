//! Helpers shared by tests across the workspace.

use crate::models::{assignment, course, submission, user};
use crate::models::user::Role;
use chrono::{Duration, Utc};
use migration::Migrator;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;

/// Fresh in-memory SQLite database with every migration applied.
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory db");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

pub async fn seed_user(db: &DatabaseConnection, username: &str, role: Role) -> user::Model {
    user::Model::create(db, username, role)
        .await
        .expect("Failed to seed user")
}

/// Creates a course owned by `professor_id` with a single assignment due in a week.
pub async fn seed_course(
    db: &DatabaseConnection,
    code: &str,
    professor_id: i64,
) -> (course::Model, assignment::Model) {
    let course = course::Model::create(db, code, &format!("{code} course"), professor_id)
        .await
        .expect("Failed to seed course");
    let assignment =
        assignment::Model::create(db, course.id, "Assignment 1", Utc::now() + Duration::days(7))
            .await
            .expect("Failed to seed assignment");
    (course, assignment)
}

/// Inserts a pending submission row directly, bypassing the grading service.
pub async fn seed_submission(
    db: &DatabaseConnection,
    assignment_id: i64,
    student_id: i64,
    file_ref: &str,
) -> submission::Model {
    let now = Utc::now();
    submission::ActiveModel {
        assignment_id: Set(assignment_id),
        student_id: Set(student_id),
        file_ref: Set(file_ref.to_owned()),
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
    .insert(db)
    .await
    .expect("Failed to seed submission")
}
