//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and mutation for testing or overrides in runtime environments.

use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock, RwLockReadGuard};

/// Largest grade the `(5,2)` storage precision can hold.
pub const STORAGE_MAX_GRADE: Decimal = Decimal::from_parts(99_999, 0, 0, false, 2);

/// Grade ceiling used when `MAX_GRADE` is unset or unusable.
pub const DEFAULT_MAX_GRADE: Decimal = Decimal::from_parts(10_000, 0, 0, false, 2);

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub database_path: String,
    pub max_grade: Decimal,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Every value has a default, so loading never fails.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "grading-portal".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "logs/grading.log".into()),
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/grading.db".into()),
            max_grade: env::var("MAX_GRADE")
                .map(|raw| parse_max_grade(&raw))
                .unwrap_or(DEFAULT_MAX_GRADE),
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn global() -> RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    /// Override the grade ceiling. Values outside `(0, 999.99]` or with more than
    /// two decimals are ignored.
    pub fn set_max_grade(value: Decimal) {
        if is_valid_max_grade(value) {
            AppConfig::set_field(|cfg| cfg.max_grade = value);
        } else {
            log::warn!("Ignoring invalid max grade override {value}");
        }
    }

    /// Connection URL for `database_path`; see [`database_url`].
    pub fn database_url(&self) -> String {
        database_url(&self.database_path)
    }
}

/// Whether `path_or_url` is already a connection string rather than a file path.
pub fn is_dsn(path_or_url: &str) -> bool {
    path_or_url.starts_with("sqlite:")
        || path_or_url.starts_with("postgres://")
        || path_or_url.starts_with("mysql://")
}

/// A DSN is returned as-is; anything else is a SQLite file created on first use.
pub fn database_url(path_or_url: &str) -> String {
    if is_dsn(path_or_url) {
        path_or_url.to_string()
    } else {
        format!("sqlite://{path_or_url}?mode=rwc")
    }
}

/// A usable grade ceiling: positive, at most two decimals, within storage precision.
pub fn is_valid_max_grade(value: Decimal) -> bool {
    value > Decimal::ZERO && value <= STORAGE_MAX_GRADE && value.normalize().scale() <= 2
}

fn parse_max_grade(raw: &str) -> Decimal {
    match Decimal::from_str(raw.trim()) {
        Ok(value) if is_valid_max_grade(value) => value,
        _ => {
            log::warn!("MAX_GRADE={raw:?} is not a usable grade ceiling, using {DEFAULT_MAX_GRADE}");
            DEFAULT_MAX_GRADE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_max_grade_accepts_two_decimals() {
        assert_eq!(parse_max_grade("50.5"), Decimal::new(505, 1));
        assert_eq!(parse_max_grade(" 20 "), Decimal::new(20, 0));
    }

    #[test]
    fn parse_max_grade_falls_back_on_bad_input() {
        assert_eq!(parse_max_grade("abc"), DEFAULT_MAX_GRADE);
        assert_eq!(parse_max_grade("-5"), DEFAULT_MAX_GRADE);
        assert_eq!(parse_max_grade("0"), DEFAULT_MAX_GRADE);
        assert_eq!(parse_max_grade("1000"), DEFAULT_MAX_GRADE);
        assert_eq!(parse_max_grade("10.125"), DEFAULT_MAX_GRADE);
    }

    #[test]
    fn dsn_is_used_as_is() {
        assert_eq!(database_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            database_url("postgres://localhost/grading"),
            "postgres://localhost/grading"
        );
        assert!(is_dsn("mysql://db/grading"));
    }

    #[test]
    fn file_path_becomes_sqlite_url() {
        assert!(!is_dsn("data/grading.db"));
        assert_eq!(
            database_url("data/grading.db"),
            "sqlite://data/grading.db?mode=rwc"
        );
        assert_eq!(
            database_url("/var/lib/grading.db"),
            "sqlite:///var/lib/grading.db?mode=rwc"
        );
    }

    #[test]
    fn set_max_grade_ignores_invalid_values() {
        AppConfig::set_max_grade(Decimal::new(5000, 2));
        assert_eq!(AppConfig::global().max_grade, Decimal::new(50, 0));

        for bad in [
            Decimal::ZERO,
            Decimal::new(-10, 0),
            Decimal::new(100_000, 2),
            Decimal::new(10_125, 3),
        ] {
            AppConfig::set_max_grade(bad);
            assert_eq!(AppConfig::global().max_grade, Decimal::new(50, 0));
        }
    }

    #[test]
    fn storage_constants_have_expected_values() {
        assert_eq!(STORAGE_MAX_GRADE.to_string(), "999.99");
        assert_eq!(DEFAULT_MAX_GRADE.to_string(), "100.00");
    }
}
