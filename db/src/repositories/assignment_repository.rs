use crate::models::{
    assignment::{self, Column, Entity},
    course,
};
use crate::repository::Repository;
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait};

pub struct AssignmentRepository;

impl AssignmentRepository {
    /// Loads an assignment together with the course it belongs to.
    pub async fn find_with_course<C>(
        db: &C,
        assignment_id: i64,
    ) -> Result<Option<(assignment::Model, course::Model)>, DbErr>
    where
        C: ConnectionTrait,
    {
        let row = Entity::find_by_id(assignment_id)
            .find_also_related(course::Entity)
            .one(db)
            .await?;

        Ok(row.and_then(|(assignment, course)| course.map(|course| (assignment, course))))
    }

    pub async fn ids_for_course<C>(db: &C, course_id: i64) -> Result<Vec<i64>, DbErr>
    where
        C: ConnectionTrait,
    {
        let assignments = Repository::<Entity, Column>::find_all(
            db,
            Condition::all().add(Column::CourseId.eq(course_id)),
            Some("id"),
        )
        .await?;

        Ok(assignments.into_iter().map(|a| a.id).collect())
    }
}
