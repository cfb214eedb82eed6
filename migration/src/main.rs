use common::config::{self, AppConfig};
use std::{env, fs, path::Path, process};

mod runner;

#[tokio::main]
async fn main() {
    let (project_name, app_env, db_path, url, log_level, log_file) = {
        let config = AppConfig::global();
        (
            config.project_name.clone(),
            config.env.clone(),
            config.database_path.clone(),
            config.database_url(),
            config.log_level.clone(),
            config.log_file.clone(),
        )
    };

    if let Err(err) = common::logger::init_logger(&log_level, &log_file) {
        eprintln!("Failed to initialise logger: {err}");
    }

    let args: Vec<String> = env::args().collect();
    let mode = args.get(1).map(|s| s.as_str());
    log::info!(
        "{} ({}): migration {} against {}",
        project_name,
        app_env,
        mode.unwrap_or("up"),
        url
    );

    let db_file = db_file(&db_path);
    let outcome = match mode {
        Some("clean") => {
            remove_db_file(db_file);
            Ok(())
        }
        Some("fresh") => {
            remove_db_file(db_file);
            create_db_dir(db_file);
            runner::run_all_migrations(&url).await
        }
        _ => {
            create_db_dir(db_file);
            runner::run_all_migrations(&url).await
        }
    };

    if let Err(err) = outcome {
        eprintln!("Migration run failed: {err}");
        process::exit(1);
    }
}

/// The SQLite file behind `DATABASE_PATH`, or `None` when it is a DSN.
fn db_file(path_or_url: &str) -> Option<&Path> {
    (!config::is_dsn(path_or_url)).then(|| Path::new(path_or_url))
}

fn remove_db_file(db_file: Option<&Path>) {
    let Some(db_path) = db_file else {
        println!("DATABASE_PATH is a connection string, nothing to delete");
        return;
    };

    if db_path.exists() {
        match fs::remove_file(db_path) {
            Ok(()) => println!("Deleted DB: {}", db_path.display()),
            Err(err) => {
                eprintln!("Failed to delete DB file {}: {err}", db_path.display());
                process::exit(1);
            }
        }
    } else {
        println!("DB file does not exist: {}", db_path.display());
    }
}

fn create_db_dir(db_file: Option<&Path>) {
    if let Some(parent) = db_file.and_then(Path::parent) {
        if let Err(err) = fs::create_dir_all(parent) {
            eprintln!("Failed to create DB directory {}: {err}", parent.display());
            process::exit(1);
        }
    }
}
