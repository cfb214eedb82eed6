//! Submission grading lifecycle: the state machine, its guards and the stores it
//! persists through.

pub mod error;
pub mod grade;
pub mod grading_service;
pub mod guard;
pub mod lifecycle;
pub mod memory_store;
pub mod sea_orm_store;
pub mod store;
pub mod submission;
pub mod summary;

pub use error::GradingError;
pub use grade::{Grade, GradeBounds};
pub use grading_service::GradingService;
pub use guard::{Actor, AssignmentRef, Role};
pub use submission::{FileRef, GradingState, NewSubmission, Submission, SubmissionStatus};
pub use summary::GradingSummary;
