pub mod assignment_repository;
pub mod submission_repository;
