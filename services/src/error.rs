use sea_orm::DbErr;
use thiserror::Error;

/// Every way a grading operation can be refused or fail.
#[derive(Debug, Error)]
pub enum GradingError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Submission {0} is already finalized")]
    AlreadyFinalized(i64),

    #[error("Submission {0} is not finalized")]
    NotFinalized(i64),

    #[error("Invalid grade: {0}")]
    InvalidGrade(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Conflicting write: {0}")]
    ConflictingWrite(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl GradingError {
    pub(crate) fn inconsistent_row(id: i64, what: &str) -> Self {
        GradingError::Database(DbErr::Custom(format!(
            "submission {id} has inconsistent grading columns: {what}"
        )))
    }
}
