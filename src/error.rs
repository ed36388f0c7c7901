//! Unified error types for EduDash with fail-open handling.
//!
//! The state store never surfaces persistence failures to its callers. Errors
//! are still typed here so the storage layer can report precisely what went
//! wrong; the store then logs them and carries on with in-memory state.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for EduDash operations.
#[derive(Error, Debug)]
pub enum EduDashError {
    /// I/O errors from the file-backed key/value store.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Key/value collaborator failures that are not plain I/O.
    #[error("persistence error for key {key}: {message}")]
    Persistence { key: String, message: String },

    /// JSON serialization or parsing errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },

    /// Seed dataset loading errors.
    #[error("seed error: {message}")]
    Seed { message: String },

    /// Caller-supplied values that cannot be interpreted.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

/// A specialized Result type for EduDash operations.
pub type Result<T> = std::result::Result<T, EduDashError>;

impl EduDashError {
    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a persistence error for a key.
    pub fn persistence(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Persistence {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a seed error.
    pub fn seed(message: impl Into<String>) -> Self {
        Self::Seed {
            message: message.into(),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

impl From<io::Error> for EduDashError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for EduDashError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

/// Trait for fail-open error handling.
///
/// Log the error and return a safe default instead of propagating it.
pub trait FailOpen<T> {
    /// Handle an error by logging a warning and returning the default value.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using default)", context, err);
                T::default()
            }
        }
    }
}

/// Exit codes for the `edudash` binary.
pub mod exit_codes {
    /// Command succeeded.
    pub const SUCCESS: i32 = 0;

    /// Command ran but reported failure (bad input, unknown ID).
    pub const FAILURE: i32 = 1;

    /// Startup failed before a command could run (config, seed, storage).
    pub const SETUP: i32 = 2;

    /// The process panicked.
    pub const CRASH: i32 = 3;
}
