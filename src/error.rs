//! Error types
//!
//! The timer engine itself cannot fail. Everything here belongs to the shell
//! around it: the preference file, the notification side effects and the
//! shared state lock.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from loading or saving interval preferences
#[derive(Error, Debug)]
pub enum PreferenceError {
    /// No preferences have been saved yet
    #[error("Preferences file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to access preferences at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed preferences at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors from delivering a phase notification
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Tone playback failed or no player is available
    #[error("Sound playback failed: {0}")]
    Sound(String),

    #[error("Failed to write notification log: {0}")]
    Log(#[from] std::io::Error),

    /// The desktop notification could not be shown
    #[error("Desktop notification failed: {0}")]
    Display(String),
}

/// Errors from the shared application state
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to lock {0}")]
    LockPoisoned(&'static str),
}
