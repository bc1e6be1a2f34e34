// Chronomarks process configuration
// Resolved from the environment; the organizer itself has no tunable settings.

use std::path::{Path, PathBuf};

/// Directory holding `chronomarks.db`.
pub const DATA_DIR_ENV: &str = "CHRONOMARKS_DATA_DIR";
/// `tracing` filter directive, e.g. `debug` or `chronomarks=trace`.
pub const LOG_ENV: &str = "CHRONOMARKS_LOG";

pub const DB_FILE_NAME: &str = "chronomarks.db";
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Settings for the RPC server process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub db_path: PathBuf,
    pub log_filter: String,
}

impl ServerConfig {
    /// Reads the process environment.
    pub fn from_env() -> Self {
        Self::resolve(
            std::env::var(DATA_DIR_ENV).ok(),
            std::env::var(LOG_ENV).ok(),
            std::env::current_exe().ok(),
        )
    }

    /// Builds a config from explicit inputs.
    ///
    /// The database lives in `data_dir` when set, otherwise next to the
    /// executable, otherwise in the working directory.
    pub fn resolve(data_dir: Option<String>, log_filter: Option<String>, exe: Option<PathBuf>) -> Self {
        let db_path = match data_dir.filter(|d| !d.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir).join(DB_FILE_NAME),
            None => match exe {
                Some(exe) => exe.parent().unwrap_or(Path::new(".")).join(DB_FILE_NAME),
                None => PathBuf::from(DB_FILE_NAME),
            },
        };

        let log_filter = log_filter
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Self { db_path, log_filter }
    }
}
