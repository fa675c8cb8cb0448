//! Error types for dataset loading

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate record id: {0}")]
    DuplicateId(u64),

    #[error("Record '{name}' has severity {severity}, expected 0-10")]
    SeverityOutOfRange { name: String, severity: u8 },

    #[error("Record '{0}' has no positive id")]
    MissingId(String),

    #[error("Record with id {0:?} has an empty name")]
    EmptyName(Option<u64>),
}
