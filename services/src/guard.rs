//! Role and ownership checks for grading operations.

use crate::error::GradingError;
use crate::submission::Submission;
use db::models::user;

pub use db::models::user::Role;

/// Who is invoking an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i64,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: i64, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn student(user_id: i64) -> Self {
        Self::new(user_id, Role::Student)
    }

    pub fn professor(user_id: i64) -> Self {
        Self::new(user_id, Role::Professor)
    }

    pub fn admin(user_id: i64) -> Self {
        Self::new(user_id, Role::Admin)
    }
}

impl From<&user::Model> for Actor {
    fn from(model: &user::Model) -> Self {
        Self::new(model.id, model.role)
    }
}

/// Ownership facts about an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentRef {
    pub id: i64,
    pub course_id: i64,
    /// Professor owning the course.
    pub professor_id: i64,
}

pub fn require_student(actor: &Actor) -> Result<(), GradingError> {
    if actor.role != Role::Student {
        return Err(GradingError::Forbidden(format!(
            "only students can submit (user {} is {})",
            actor.user_id, actor.role
        )));
    }
    Ok(())
}

/// Professors and admins may grade; whether this professor may grade this
/// assignment is decided by [`authorize_grading`].
pub fn require_grader(actor: &Actor) -> Result<(), GradingError> {
    match actor.role {
        Role::Professor | Role::Admin => Ok(()),
        Role::Student => Err(GradingError::Forbidden(format!(
            "user {} cannot grade submissions",
            actor.user_id
        ))),
    }
}

pub fn authorize_resubmit(actor: &Actor, submission: &Submission) -> Result<(), GradingError> {
    require_student(actor)?;
    if submission.student_id != actor.user_id {
        return Err(GradingError::Forbidden(format!(
            "submission {} belongs to another student",
            submission.id
        )));
    }
    Ok(())
}

pub fn authorize_grading(actor: &Actor, assignment: &AssignmentRef) -> Result<(), GradingError> {
    match actor.role {
        Role::Admin => Ok(()),
        Role::Professor if assignment.professor_id == actor.user_id => Ok(()),
        _ => Err(GradingError::Forbidden(format!(
            "user {} does not own course {}",
            actor.user_id, assignment.course_id
        ))),
    }
}
