//! Service configuration.
//!
//! Resolved once at process startup and passed into the service. Request
//! handling never reads environment variables.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Environment variable naming the SQLite database file.
pub const ENV_DB_PATH: &str = "PATIENT_SERVICE_DB_PATH";
/// Environment variable holding the tracing filter directive.
pub const ENV_LOG: &str = "PATIENT_SERVICE_LOG";

/// Filter used when none is configured.
pub const DEFAULT_LOG_FILTER: &str = "patient_service_core=info";

/// Special database path selecting an in-memory store.
pub const IN_MEMORY_PATH: &str = ":memory:";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid log filter {filter:?}: {reason}")]
    InvalidLogFilter { filter: String, reason: String },

    #[error("database path cannot be empty")]
    EmptyDatabasePath,

    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(String),
}

/// Where patient records are kept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatabaseLocation {
    InMemory,
    File(PathBuf),
}

/// Configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    database: DatabaseLocation,
    log_filter: String,
}

impl ServiceConfig {
    /// Create a new `ServiceConfig`, validating the log filter.
    pub fn new(database: DatabaseLocation, log_filter: impl Into<String>) -> Result<Self, ConfigError> {
        let log_filter = log_filter.into();
        EnvFilter::try_new(&log_filter).map_err(|e| ConfigError::InvalidLogFilter {
            filter: log_filter.clone(),
            reason: e.to_string(),
        })?;

        if let DatabaseLocation::File(path) = &database {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::EmptyDatabasePath);
            }
        }

        Ok(Self {
            database,
            log_filter,
        })
    }

    /// Build from raw values as read from the environment.
    ///
    /// A missing or blank database path selects the in-memory store; a missing
    /// or blank filter falls back to [`DEFAULT_LOG_FILTER`].
    pub fn from_values(db_path: Option<String>, log_filter: Option<String>) -> Result<Self, ConfigError> {
        let database = match non_blank(db_path).as_deref() {
            None | Some(IN_MEMORY_PATH) => DatabaseLocation::InMemory,
            Some(path) => DatabaseLocation::File(PathBuf::from(path)),
        };
        let log_filter = non_blank(log_filter).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Self::new(database, log_filter)
    }

    /// Read [`ENV_DB_PATH`] and [`ENV_LOG`] from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(std::env::var(ENV_DB_PATH).ok(), std::env::var(ENV_LOG).ok())
    }

    pub fn database(&self) -> &DatabaseLocation {
        &self.database
    }

    pub fn database_path(&self) -> Option<&Path> {
        match &self.database {
            DatabaseLocation::File(path) => Some(path),
            DatabaseLocation::InMemory => None,
        }
    }

    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ServiceConfig::from_values(None, None).unwrap();
        assert_eq!(cfg.database(), &DatabaseLocation::InMemory);
        assert_eq!(cfg.log_filter(), DEFAULT_LOG_FILTER);
        assert!(cfg.database_path().is_none());
    }

    #[test]
    fn test_blank_values_fall_back() {
        let cfg = ServiceConfig::from_values(Some("  ".into()), Some("".into())).unwrap();
        assert_eq!(cfg.database(), &DatabaseLocation::InMemory);
        assert_eq!(cfg.log_filter(), DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_memory_marker() {
        let cfg = ServiceConfig::from_values(Some(":memory:".into()), None).unwrap();
        assert_eq!(cfg.database(), &DatabaseLocation::InMemory);
    }

    #[test]
    fn test_file_path() {
        let cfg = ServiceConfig::from_values(Some("/var/lib/patients.db".into()), Some("debug".into()))
            .unwrap();
        assert_eq!(cfg.database_path(), Some(Path::new("/var/lib/patients.db")));
        assert_eq!(cfg.log_filter(), "debug");
    }

    #[test]
    fn test_invalid_filter_rejected() {
        let result = ServiceConfig::from_values(None, Some("patient_service_core=loud".into()));
        assert!(matches!(result, Err(ConfigError::InvalidLogFilter { .. })));
    }

    #[test]
    fn test_empty_file_path_rejected() {
        let result = ServiceConfig::new(DatabaseLocation::File(PathBuf::new()), "info");
        assert!(matches!(result, Err(ConfigError::EmptyDatabasePath)));
    }
}
