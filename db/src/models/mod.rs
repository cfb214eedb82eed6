pub mod assignment;
pub mod course;
pub mod submission;
pub mod user;

pub use assignment::Entity as Assignment;
pub use course::Entity as Course;
pub use submission::Entity as Submission;
pub use user::Entity as User;
