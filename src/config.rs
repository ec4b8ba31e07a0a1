//! Runtime settings resolved from the environment.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable overriding the database file location.
pub const DB_PATH_VAR: &str = "STUDENT_RECORDS_DB";
/// Environment variable overriding the log file location.
pub const LOG_PATH_VAR: &str = "STUDENT_RECORDS_LOG";

/// Database file, relative to the working directory unless overridden.
const DEFAULT_DB_PATH: &str = "database.db";
const DEFAULT_LOG_PATH: &str = "student-records.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_path: PathBuf,
    pub log_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DB_PATH),
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var_os(key))
    }

    /// Build the config from an arbitrary key lookup. Unset or empty values
    /// fall back to the defaults; non-UTF-8 paths are kept as-is.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let defaults = Self::default();
        let resolve = |key: &str, fallback: PathBuf| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
                .unwrap_or(fallback)
        };

        Self {
            database_path: resolve(DB_PATH_VAR, defaults.database_path),
            log_path: resolve(LOG_PATH_VAR, defaults.log_path),
        }
    }
}
