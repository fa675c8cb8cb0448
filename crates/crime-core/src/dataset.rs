//! The immutable offense dataset

use std::collections::HashSet;
use std::path::Path;

use crime_types::OffenseRecord;

use crate::error::DatasetError;
use crate::ingest;

/// Records compiled into the binary.
const EMBEDDED_CRIMES: &str = include_str!("../data/crimes.json");

/// Ordered, validated list of offense records.
///
/// Every record carries a unique positive id so `GET /v1/crimes/:id` can
/// reach it. Id-less payloads are only usable through the client
/// [`Catalog`](crate::Catalog).
///
/// Built once at startup and only ever read afterwards, so it can be shared
/// across request handlers behind an `Arc` without locking.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<OffenseRecord>,
}

impl Dataset {
    /// Validate and wrap `records`, keeping their order.
    pub fn new(records: Vec<OffenseRecord>) -> Result<Self, DatasetError> {
        let mut seen = HashSet::new();

        for record in &records {
            if record.name.trim().is_empty() {
                return Err(DatasetError::EmptyName(record.id));
            }
            if record.severity > 10 {
                return Err(DatasetError::SeverityOutOfRange {
                    name: record.name.clone(),
                    severity: record.severity,
                });
            }
            let id = match record.id {
                Some(id) if id > 0 => id,
                _ => return Err(DatasetError::MissingId(record.name.clone())),
            };
            if !seen.insert(id) {
                return Err(DatasetError::DuplicateId(id));
            }
        }

        Ok(Self { records })
    }

    /// The built-in catalogue of offenses.
    pub fn embedded() -> Result<Self, DatasetError> {
        let records: Vec<OffenseRecord> = serde_json::from_str(EMBEDDED_CRIMES)?;
        Self::new(records)
    }

    /// Parse a JSON document in any shape [`ingest::records_from_payload`] accepts.
    pub fn from_json_str(json: &str) -> Result<Self, DatasetError> {
        let payload: serde_json::Value = serde_json::from_str(json)?;
        Self::new(ingest::records_from_payload(&payload))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        tracing::info!("Loading dataset from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn records(&self) -> &[OffenseRecord] {
        &self.records
    }

    /// Look up a record by id.
    pub fn get(&self, id: u64) -> Option<&OffenseRecord> {
        self.records.iter().find(|r| r.id == Some(id))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
