//! Application state for the Crimes API

use std::path::Path;

use anyhow::{Context, Result};
use crime_core::Dataset;

pub struct AppState {
    pub dataset: Dataset,
}

impl AppState {
    /// Load the dataset once; it is read-only for the life of the process.
    pub fn new(dataset_path: Option<&Path>) -> Result<Self> {
        let dataset = match dataset_path {
            Some(path) => Dataset::from_path(path)
                .with_context(|| format!("loading dataset from {}", path.display()))?,
            None => Dataset::embedded().context("loading embedded dataset")?,
        };

        tracing::info!("Loaded {} offense records", dataset.len());

        Ok(Self::with_dataset(dataset))
    }

    pub fn with_dataset(dataset: Dataset) -> Self {
        Self { dataset }
    }
}
