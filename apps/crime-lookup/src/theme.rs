//! Dark/light theme preference and its persistence.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PreferenceError;

/// Preference key the theme is stored under.
pub const THEME_KEY: &str = "lrh-theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key/value storage for user preferences.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// Preferences kept as a flat JSON object on disk.
///
/// A missing file reads as empty. Every `set` rewrites the whole file, and a
/// file that is not valid JSON is replaced rather than blocking the write.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, PreferenceError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut prefs = match self.read_all() {
            Err(PreferenceError::Corrupt(e)) => {
                tracing::warn!("Overwriting corrupt preferences file {}: {}", self.path.display(), e);
                BTreeMap::new()
            }
            other => other?,
        };
        prefs.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&prefs)?)?;
        tracing::debug!("Saved preference {} to {}", key, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: BTreeMap<String, String>,
}

#[cfg(test)]
impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Whether a `COLORFGBG` value ("fg;bg" or "fg;default;bg") describes a dark background.
pub fn prefers_dark_from_colorfgbg(value: Option<&str>) -> Option<bool> {
    let background = value?.rsplit(';').next()?.trim().parse::<u8>().ok()?;
    Some(matches!(background, 0..=6 | 8))
}

/// The operating environment's theme preference, if it states one.
pub fn system_prefers_dark() -> Option<bool> {
    prefers_dark_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}

/// Saved theme first, then the system preference, then light.
///
/// An unreadable or unrecognized saved value is ignored.
pub fn initial_theme(store: &impl PreferenceStore, system_dark: Option<bool>) -> Theme {
    let saved = match store.get(THEME_KEY) {
        Ok(value) => value.as_deref().and_then(Theme::parse),
        Err(e) => {
            tracing::warn!("Ignoring saved theme: {}", e);
            None
        }
    };

    saved.unwrap_or(match system_dark {
        Some(true) => Theme::Dark,
        _ => Theme::Light,
    })
}

/// Persist `theme` as the saved preference.
pub fn save_theme(store: &mut impl PreferenceStore, theme: Theme) -> Result<(), PreferenceError> {
    store.set(THEME_KEY, theme.as_str())
}

/// Flip `current`, persist the result and return it.
pub fn toggle_theme(
    store: &mut impl PreferenceStore,
    current: Theme,
) -> Result<Theme, PreferenceError> {
    let next = current.toggled();
    save_theme(store, next)?;
    Ok(next)
}
