//! Lazy, memoized dataset loading.
//!
//! The catalog is fetched at most once per session. The cache lock is held
//! for the whole fetch, so callers that arrive while a load is in flight
//! wait for it instead of issuing their own request. A failed load leaves an
//! empty catalog behind until [`DatasetLoader::invalidate`] is called.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CACHE_CONTROL, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crime_core::Catalog;

use crate::error::LoadError;

/// Somewhere a crime payload can be fetched from.
pub trait DatasetSource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<Value, LoadError>> + Send;

    /// Human-readable origin for log lines.
    fn describe(&self) -> String;
}

/// Run `source.fetch()` and abandon it once `deadline` has elapsed.
///
/// Dropping the fetch future cancels the underlying request.
pub async fn fetch_with_deadline<S: DatasetSource>(
    source: &S,
    deadline: Duration,
) -> Result<Value, LoadError> {
    tokio::time::timeout(deadline, source.fetch())
        .await
        .map_err(|_| LoadError::Timeout(deadline))?
}

/// GET a JSON document over HTTP.
#[derive(Clone)]
pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Result<Self, LoadError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("crime-lookup/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl DatasetSource for HttpSource {
    async fn fetch(&self) -> Result<Value, LoadError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Owns the session's cached catalog.
pub struct DatasetLoader<S> {
    source: S,
    deadline: Duration,
    cache: Mutex<Option<Arc<Catalog>>>,
}

impl<S: DatasetSource> DatasetLoader<S> {
    pub fn new(source: S, deadline: Duration) -> Self {
        Self {
            source,
            deadline,
            cache: Mutex::new(None),
        }
    }

    /// Return the cached catalog, fetching it first if nothing is cached.
    ///
    /// On failure the error is returned once and an empty catalog is cached
    /// in its place; nothing is retried automatically.
    #[instrument(skip(self), fields(source = %self.source.describe()))]
    pub async fn get_or_load(&self) -> Result<Arc<Catalog>, LoadError> {
        let mut cache = self.cache.lock().await;
        if let Some(catalog) = cache.as_ref() {
            debug!("Using cached catalog ({} records)", catalog.len());
            return Ok(Arc::clone(catalog));
        }

        info!("Loading crime data...");
        match fetch_with_deadline(&self.source, self.deadline).await {
            Ok(payload) => {
                let catalog = Arc::new(Catalog::from_payload(&payload));
                info!("Loaded {} crime records", catalog.len());
                *cache = Some(Arc::clone(&catalog));
                Ok(catalog)
            }
            Err(e) => {
                warn!("Load error: {}", e);
                *cache = Some(Arc::new(Catalog::default()));
                Err(e)
            }
        }
    }

    /// Forget the cached catalog so the next lookup fetches again.
    pub async fn invalidate(&self) {
        *self.cache.lock().await = None;
        debug!("Catalog cache invalidated");
    }

    pub async fn is_loaded(&self) -> bool {
        self.cache.lock().await.is_some()
    }
}
