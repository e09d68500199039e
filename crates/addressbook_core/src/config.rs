//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve backing-file path and logging settings for CLI/FFI callers.
//!
//! # Invariants
//! - Blank environment values count as unset.
//! - Resolution never fails; every setting has a default except `log_dir`,
//!   whose absence disables file logging.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "ADDRESSBOOK_DB_PATH";
pub const ENV_LOG_DIR: &str = "ADDRESSBOOK_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "ADDRESSBOOK_LOG_LEVEL";

/// Default backing-file name inside the data directory.
pub const DEFAULT_DB_FILE_NAME: &str = "addressbook.sqlite3";
const APP_DIR_NAME: &str = "addressbook";

/// Effective settings for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressBookConfig {
    pub db_path: PathBuf,
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
}

impl AddressBookConfig {
    /// Resolves settings from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(default_db_path),
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
            log_level: read(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
        }
    }
}

/// `<data dir>/addressbook/addressbook.sqlite3`, or the temp dir when the
/// platform reports no data directory.
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(std::env::temp_dir)
        .join(DEFAULT_DB_FILE_NAME)
}
