//! Error types for the lookup client

use std::time::Duration;

use thiserror::Error;

/// Why the dataset could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("{status} {reason}")]
    Status { status: u16, reason: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Failures reading or writing the preferences file.
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("Failed to access preferences: {0}")]
    Io(#[from] std::io::Error),

    #[error("Preferences file is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}
