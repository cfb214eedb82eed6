use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202505290001_create_users::Migration),
            Box::new(migrations::m202505290002_create_courses::Migration),
            Box::new(migrations::m202505290004_create_assignments::Migration),
            Box::new(migrations::m202505290006_create_submissions::Migration),
        ]
    }
}
