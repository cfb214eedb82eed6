use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Relational row of a student's submission for an assignment.
///
/// There is at most one row per `(assignment_id, student_id)`, enforced by the
/// `idx_submissions_assignment_student` unique index. The grading columns are only
/// meaningful in the combinations the grading lifecycle produces; `services`
/// rejects any other combination when it loads a row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    /// Primary key of the submission.
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the related assignment.
    pub assignment_id: i64,
    /// ID of the student who submitted.
    pub student_id: i64,
    /// Opaque reference to the stored artifact.
    pub file_ref: String,
    /// Time of the most recent submit or resubmit.
    pub submitted_at: DateTime<Utc>,
    /// Grade in hundredths of a point.
    pub grade_hundredths: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub feedback: Option<String>,
    pub is_finalized: bool,
    pub finalized_at: Option<DateTime<Utc>>,
    /// Optimistic lock counter, bumped on every update.
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Defines relationships between `submissions` and other tables.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignment::Entity",
        from = "Column::AssignmentId",
        to = "super::assignment::Column::Id"
    )]
    Assignment,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id"
    )]
    Student,
}

impl Related<super::assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
