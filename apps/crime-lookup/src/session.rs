//! One interactive lookup session: loader, theme and the last suggestion list.

use std::sync::Arc;

use crime_core::{Catalog, MatchResult};

use crate::error::{LoadError, PreferenceError};
use crate::loader::{DatasetLoader, DatasetSource};
use crate::render::{Notice, Palette, Renderer};
use crate::theme::{self, PreferenceStore, Theme};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text { color: bool },
    Html,
}

pub struct LookupSession<S, P> {
    loader: DatasetLoader<S>,
    prefs: P,
    theme: Theme,
    format: OutputFormat,
    last_suggestions: Vec<String>,
}

impl<S: DatasetSource, P: PreferenceStore> LookupSession<S, P> {
    pub fn new(loader: DatasetLoader<S>, prefs: P, theme: Theme, format: OutputFormat) -> Self {
        Self {
            loader,
            prefs,
            theme,
            format,
            last_suggestions: Vec::new(),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn last_suggestions(&self) -> &[String] {
        &self.last_suggestions
    }

    fn renderer(&self) -> Renderer {
        match self.format {
            OutputFormat::Html => Renderer::Html,
            OutputFormat::Text { color } => Renderer::Text(match self.theme {
                Theme::Dark => Palette::dark(color),
                Theme::Light => Palette::light(color),
            }),
        }
    }

    /// Catalog for a lookup, plus the load failure message if this call hit one.
    async fn catalog(&self) -> (Arc<Catalog>, Option<String>) {
        match self.loader.get_or_load().await {
            Ok(catalog) => (catalog, None),
            Err(e) => (Arc::new(Catalog::default()), Some(e.to_string())),
        }
    }

    /// Resolve `raw` and render whatever the cascade produced.
    pub async fn search(&mut self, raw: &str) -> String {
        let renderer = self.renderer();
        let input = raw.trim();
        if input.is_empty() {
            return renderer.notice(Notice::EmptyInput);
        }

        let (catalog, failure) = self.catalog().await;
        let mut blocks = Vec::new();
        if let Some(reason) = failure.as_deref() {
            blocks.push(renderer.notice(Notice::LoadFailed(reason)));
        }

        if catalog.is_empty() {
            blocks.push(renderer.notice(Notice::DatasetUnavailable));
            return blocks.join("\n");
        }

        match catalog.resolve(input) {
            MatchResult::Exact { record, strategy } => {
                tracing::debug!("Matched {:?} via {:?}", record.name, strategy);
                self.last_suggestions.clear();
                blocks.push(renderer.card(record));
            }
            MatchResult::Suggestions(candidates) => {
                self.last_suggestions = candidates.iter().map(|c| c.record.name.clone()).collect();
                blocks.push(renderer.suggestions(&candidates));
            }
            MatchResult::None => {
                self.last_suggestions.clear();
                blocks.push(renderer.notice(Notice::NoMatch(input)));
            }
        }

        blocks.join("\n")
    }

    /// Search again using the `n`th (1-based) suggestion from the last lookup.
    pub async fn pick(&mut self, n: usize) -> Option<String> {
        let name = self.last_suggestions.get(n.checked_sub(1)?)?.clone();
        Some(self.search(&name).await)
    }

    /// Sorted auto-complete names.
    pub async fn names(&self, limit: usize) -> Result<Vec<String>, LoadError> {
        let catalog = self.loader.get_or_load().await?;
        Ok(catalog
            .suggestion_names(limit)
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    /// Warm the cache; returns the record count.
    pub async fn preload(&self) -> Result<usize, LoadError> {
        Ok(self.loader.get_or_load().await?.len())
    }

    /// Drop the cached catalog so the next lookup fetches again.
    pub async fn reload(&mut self) {
        self.last_suggestions.clear();
        self.loader.invalidate().await;
    }

    pub fn toggle_theme(&mut self) -> Result<Theme, PreferenceError> {
        self.theme = theme::toggle_theme(&mut self.prefs, self.theme)?;
        Ok(self.theme)
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<(), PreferenceError> {
        theme::save_theme(&mut self.prefs, theme)?;
        self.theme = theme;
        Ok(())
    }
}
