//! Configuration loading for EduDash.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. Project config (`.edudash/config.toml`)
//! 3. User config (`~/.edudash/config.toml`)
//! 4. Defaults (lowest priority)
//!
//! All configuration is optional. The dashboard runs with the built-in seed,
//! an 800 ms simulated sync and `~/.edudash/data` storage when no config
//! exists.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{EduDashError, Result};

/// Main configuration struct for EduDash.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Key/value storage configuration.
    pub storage: StorageConfig,
    /// Simulated sync configuration.
    pub sync: SyncConfig,
    /// Seed dataset configuration.
    pub seed: SeedConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Key/value storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for stored aggregates. Defaults to `<edudash_home>/data`.
    pub data_dir: Option<PathBuf>,
}

/// Simulated sync configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SyncConfig {
    /// How long a sync pretends to take, in milliseconds.
    pub delay_ms: u64,
}

/// Upper bound for the simulated sync delay (one minute).
pub const MAX_SYNC_DELAY_MS: u64 = 60_000;

impl SyncConfig {
    /// Check if a delay value is valid (at most `MAX_SYNC_DELAY_MS`).
    pub fn is_valid_delay_ms(value: u64) -> bool {
        value <= MAX_SYNC_DELAY_MS
    }

    /// The delay as a `Duration`.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { delay_ms: 800 }
    }
}

/// Seed dataset configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SeedConfig {
    /// JSON seed file replacing the built-in dataset.
    pub path: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Tracing filter directive (e.g. "warn" or "edudash=debug").
    pub level: String,
}

/// Plain level names accepted from the environment.
pub const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

impl LoggingConfig {
    /// Check if a level value is one of the plain level names.
    pub fn is_valid_level(value: &str) -> bool {
        VALID_LOG_LEVELS.contains(&value)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load configuration with full precedence chain.
    pub fn load() -> Self {
        match env::current_dir() {
            Ok(cwd) => Self::load_from_cwd(&cwd),
            Err(_) => {
                let mut config = Config::default();
                if let Some(user_config) = Self::load_user_config() {
                    config = config.merge(user_config);
                }
                config.apply_env_overrides();
                config
            }
        }
    }

    /// Load configuration with a specific working directory.
    pub fn load_from_cwd(cwd: &Path) -> Self {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config() {
            config = config.merge(user_config);
        }

        if let Some(project_config) = Self::load_project_config(cwd) {
            config = config.merge(project_config);
        }

        config.apply_env_overrides();

        config
    }

    /// Load user config from `~/.edudash/config.toml`.
    fn load_user_config() -> Option<Config> {
        let home = edudash_home()?;
        Self::load_from_file(&home.join("config.toml")).ok()
    }

    /// Load project config from `.edudash/config.toml` in the given directory.
    fn load_project_config(cwd: &Path) -> Option<Config> {
        let config_path = cwd.join(".edudash").join("config.toml");
        Self::load_from_file(&config_path).ok()
    }

    /// Load config from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| EduDashError::storage(path, e))?;
        toml::from_str(&content).map_err(|e| EduDashError::config(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // EDUDASH_DATA_DIR
        if let Ok(val) = env::var("EDUDASH_DATA_DIR") {
            if val.is_empty() {
                eprintln!("Warning: EDUDASH_DATA_DIR is empty. Ignoring.");
            } else {
                self.storage.data_dir = Some(PathBuf::from(val));
            }
        }

        // EDUDASH_SYNC_DELAY_MS
        if let Ok(val) = env::var("EDUDASH_SYNC_DELAY_MS") {
            match val.parse::<u64>() {
                Ok(n) if SyncConfig::is_valid_delay_ms(n) => self.sync.delay_ms = n,
                Ok(n) => eprintln!(
                    "Warning: Invalid EDUDASH_SYNC_DELAY_MS value '{}'. \
                    Must be <= {}. Using '{}'.",
                    n, MAX_SYNC_DELAY_MS, self.sync.delay_ms
                ),
                Err(_) => eprintln!(
                    "Warning: Invalid EDUDASH_SYNC_DELAY_MS value '{}'. \
                    Expected a non-negative integer. Using '{}'.",
                    val, self.sync.delay_ms
                ),
            }
        }

        // EDUDASH_SEED
        if let Ok(val) = env::var("EDUDASH_SEED") {
            if !val.is_empty() {
                self.seed.path = Some(PathBuf::from(val));
            }
        }

        // EDUDASH_LOG
        if let Ok(val) = env::var("EDUDASH_LOG") {
            if LoggingConfig::is_valid_level(&val) {
                self.logging.level = val;
            } else {
                eprintln!(
                    "Warning: Invalid EDUDASH_LOG value '{}'. \
                    Valid values: {:?}. Using '{}'.",
                    val, VALID_LOG_LEVELS, self.logging.level
                );
            }
        }
    }

    /// Merge another config into this one.
    ///
    /// Field by field: values in `other` that differ from the defaults win.
    /// As a consequence a higher layer cannot reset a lower layer's value back
    /// to the default.
    fn merge(mut self, other: Config) -> Self {
        if other.storage.data_dir.is_some() {
            self.storage.data_dir = other.storage.data_dir;
        }

        if other.sync.delay_ms != SyncConfig::default().delay_ms {
            self.sync.delay_ms = other.sync.delay_ms;
        }

        if other.seed.path.is_some() {
            self.seed.path = other.seed.path;
        }

        if other.logging.level != LoggingConfig::default().level {
            self.logging.level = other.logging.level;
        }

        self
    }

    /// Directory the file store should use.
    pub fn resolved_data_dir(&self) -> Option<PathBuf> {
        self.storage.data_dir.clone().or_else(data_dir)
    }
}

/// Get the EduDash home directory.
///
/// Checks `EDUDASH_HOME` first, then falls back to `~/.edudash`. An empty
/// `EDUDASH_HOME` is ignored.
pub fn edudash_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("EDUDASH_HOME") {
        if home.is_empty() {
            tracing::warn!("EDUDASH_HOME is empty, using default");
        } else {
            let path = PathBuf::from(&home);
            if path.is_absolute() {
                return Some(path);
            }
            if let Ok(canonical) = path.canonicalize() {
                return Some(canonical);
            }
            tracing::warn!("EDUDASH_HOME is relative and doesn't exist, using as-is");
            return Some(path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        return Some(home.join(".edudash"));
    }

    // Containerized/minimal environments without HOME
    let fallback = env::temp_dir().join("edudash");
    tracing::warn!(
        "HOME not set, using fallback location: {}",
        fallback.display()
    );
    Some(fallback)
}

/// Get the default data directory.
///
/// Returns `<edudash_home>/data/`.
pub fn data_dir() -> Option<PathBuf> {
    edudash_home().map(|h| h.join("data"))
}
