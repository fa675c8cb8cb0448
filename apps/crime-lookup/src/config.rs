//! Defaults for the lookup client

use std::path::PathBuf;
use std::time::Duration;

/// Where the crime JSON is hosted unless overridden.
pub const DEFAULT_CRIMES_API: &str = "https://paparx.github.io/Crime_punishment/crime.json";

/// Seconds before an in-flight dataset fetch is abandoned.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

pub fn fetch_deadline(secs: u64) -> Duration {
    Duration::from_secs(secs)
}

/// Preferences file used when none is configured.
///
/// Falls back to the working directory when the platform reports no data
/// directory.
pub fn default_prefs_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("crime-lookup")
        .join("preferences.json")
}
