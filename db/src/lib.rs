pub mod models;
pub mod repositories;
pub mod repository;
pub mod teardown;
pub mod test_utils;

use common::config::{self, AppConfig};
use sea_orm::{Database, DatabaseConnection, DbErr};
use std::path::Path;

/// Opens a connection using `DATABASE_PATH` from the global configuration.
///
/// A full DSN is used as-is; anything else is treated as a SQLite file path and
/// the file is created on first use.
pub async fn connect() -> Result<DatabaseConnection, DbErr> {
    let path_or_url = AppConfig::global().database_path.clone();

    // SQLite won't create intermediate directories.
    if !config::is_dsn(&path_or_url) {
        if let Some(parent) = Path::new(&path_or_url).parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::warn!("Could not create {}: {}", parent.display(), e);
            }
        }
    }

    connect_url(&config::database_url(&path_or_url)).await
}

pub async fn connect_url(url: &str) -> Result<DatabaseConnection, DbErr> {
    log::debug!("Connecting to {}", url);
    Database::connect(url).await
}
