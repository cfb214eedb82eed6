pub mod m202505290001_create_users;
pub mod m202505290002_create_courses;
pub mod m202505290004_create_assignments;
pub mod m202505290006_create_submissions;
