use std::path::PathBuf;

use shared::error::{AppError, AppResult};

/// Store configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | Working directory (database files live in `WORK_DIR/database`) |
/// | DB_NAMESPACE | movie_rental | SurrealDB namespace |
/// | DB_DATABASE | movie_rental | SurrealDB database |
/// | LOG_LEVEL | info | Log filter when `RUST_LOG` is unset |
/// | LOG_JSON | false | Emit JSON log lines |
/// | LOG_DIR | (none) | Directory for daily rolling log files |
/// | ENVIRONMENT | development | development, staging or production |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/var/lib/rental LOG_LEVEL=debug cargo run -p rental-store
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the database and logs
    pub work_dir: String,
    pub db_namespace: String,
    pub db_database: String,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    /// development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            db_namespace: std::env::var("DB_NAMESPACE").unwrap_or_else(|_| "movie_rental".into()),
            db_database: std::env::var("DB_DATABASE").unwrap_or_else(|_| "movie_rental".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|v| !v.trim().is_empty()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Override the working directory
    ///
    /// Used by tests to point at a temp dir
    pub fn with_work_dir(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config
    }

    /// RocksDB directory
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Reject configurations the store cannot start with
    pub fn validate(&self) -> AppResult<()> {
        if self.work_dir.trim().is_empty() {
            return Err(AppError::config("WORK_DIR must not be empty"));
        }
        if self.db_namespace.trim().is_empty() || self.db_database.trim().is_empty() {
            return Err(AppError::config("DB_NAMESPACE and DB_DATABASE must not be empty"));
        }
        if !matches!(
            self.environment.as_str(),
            "development" | "staging" | "production"
        ) {
            return Err(AppError::config(format!(
                "Unknown ENVIRONMENT: {}",
                self.environment
            )));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
