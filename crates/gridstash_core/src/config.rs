//! Runtime configuration resolved from the environment.
//!
//! # Invariants
//! - Blank or whitespace-only variables count as unset.
//! - Resolution never fails; invalid log levels surface later from
//!   `init_logging`.

use crate::logging::{default_log_level, LogSettings};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "GRIDSTASH_DB_PATH";
pub const LOG_DIR_ENV: &str = "GRIDSTASH_LOG_DIR";
pub const LOG_LEVEL_ENV: &str = "GRIDSTASH_LOG_LEVEL";

const DEFAULT_DB_FILE_NAME: &str = "gridstash.sqlite3";

/// Resolved settings for opening storage and logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    /// File logging is disabled when unset.
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
}

impl CoreConfig {
    /// Reads the `GRIDSTASH_*` variables of the current process.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|trimmed| !trimmed.is_empty())
        };

        Self {
            db_path: value(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_dir: value(LOG_DIR_ENV).map(PathBuf::from),
            log_level: value(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string()),
        }
    }

    /// Logging settings, when a log directory is configured.
    pub fn log_settings(&self) -> Option<LogSettings> {
        self.log_dir
            .as_ref()
            .map(|dir| LogSettings::new(self.log_level.clone(), dir.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn resolve(vars: &[(&str, &str)]) -> CoreConfig {
        let vars = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        CoreConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = resolve(&[]);
        assert_eq!(
            config.db_path,
            std::env::temp_dir().join("gridstash.sqlite3")
        );
        assert_eq!(config.log_dir, None);
        assert_eq!(config.log_level, default_log_level());
        assert!(config.log_settings().is_none());
    }

    #[test]
    fn explicit_values_are_trimmed() {
        let config = resolve(&[
            (DB_PATH_ENV, " /data/drawers.db "),
            (LOG_DIR_ENV, "/var/log/gridstash"),
            (LOG_LEVEL_ENV, "warn"),
        ]);
        assert_eq!(config.db_path, PathBuf::from("/data/drawers.db"));
        let settings = config.log_settings().expect("log dir configured");
        assert_eq!(settings.level, "warn");
        assert_eq!(settings.log_dir, PathBuf::from("/var/log/gridstash"));
        assert!(!settings.duplicate_to_stderr);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = resolve(&[(DB_PATH_ENV, "   "), (LOG_LEVEL_ENV, "")]);
        assert_eq!(
            config.db_path,
            std::env::temp_dir().join("gridstash.sqlite3")
        );
        assert_eq!(config.log_level, default_log_level());
    }
}
