//! Page data loading and the shared, caching JSON fetch facility.

use crate::error::{Result, SiteError};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed, sendable future used at the async seams.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The API handed to page data loaders.
pub trait PageDataApi: Send + Sync {
    /// Fetch and decode JSON from a url.
    fn fetch_json<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<JsonValue>>;
}

/// Fetch JSON and deserialize it into `T`.
pub async fn fetch_typed<T: DeserializeOwned>(api: &dyn PageDataApi, url: &str) -> Result<T> {
    let value = api.fetch_json(url).await?;
    serde_json::from_value(value).map_err(|err| SiteError::fetch(url, err))
}

/// The network layer underneath [`CachingPageDataApi`].
pub trait JsonFetcher: Send + Sync {
    /// Perform a request and decode the body as JSON.
    fn fetch_json<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<JsonValue>>;
}

/// [`PageDataApi`] that remembers every response by url for the lifetime of
/// the process.
///
/// Concurrent first requests for the same url may both hit the network; only
/// completed responses are shared.
pub struct CachingPageDataApi {
    fetcher: Arc<dyn JsonFetcher>,
    cached: Mutex<HashMap<String, JsonValue>>,
}

impl CachingPageDataApi {
    /// Wrap a fetcher with a url cache.
    pub fn new(fetcher: Arc<dyn JsonFetcher>) -> Self {
        Self {
            fetcher,
            cached: Mutex::new(HashMap::new()),
        }
    }

    /// Number of cached responses.
    pub fn cached_len(&self) -> usize {
        self.cached.lock().len()
    }
}

impl PageDataApi for CachingPageDataApi {
    fn fetch_json<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<JsonValue>> {
        Box::pin(async move {
            let cached = self.cached.lock().get(url).cloned();
            if let Some(value) = cached {
                return Ok(value);
            }

            log::info!(" : Making network request : {url}");
            let response = self.fetcher.fetch_json(url).await?;
            self.cached.lock().insert(url.to_string(), response.clone());
            Ok(response)
        })
    }
}

impl fmt::Debug for CachingPageDataApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachingPageDataApi")
            .field("cached", &self.cached_len())
            .finish()
    }
}

/// Fetcher used when none is configured; every request fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoNetwork;

impl JsonFetcher for NoNetwork {
    fn fetch_json<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<JsonValue>> {
        Box::pin(async move { Err(SiteError::fetch(url, "no fetcher configured")) })
    }
}

/// [`JsonFetcher`] backed by a `reqwest` client.
#[cfg(feature = "http")]
#[derive(Debug, Clone, Default)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

#[cfg(feature = "http")]
impl ReqwestFetcher {
    /// Use an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[cfg(feature = "http")]
impl JsonFetcher for ReqwestFetcher {
    fn fetch_json<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<JsonValue>> {
        Box::pin(async move {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .and_then(|response| response.error_for_status())
                .map_err(|err| SiteError::fetch(url, err))?;
            response
                .json::<JsonValue>()
                .await
                .map_err(|err| SiteError::fetch(url, err))
        })
    }
}

/// A page's `getData` function: receives the shared data API.
pub type DataLoader =
    Arc<dyn Fn(Arc<dyn PageDataApi>) -> BoxFuture<'static, Result<JsonValue>> + Send + Sync>;

/// Build a [`DataLoader`] from an async closure.
pub fn data_loader<F, Fut>(loader: F) -> DataLoader
where
    F: Fn(Arc<dyn PageDataApi>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<JsonValue>> + Send + 'static,
{
    Arc::new(move |api| Box::pin(loader(api)))
}

/// A data loader bound to the shared data API; nothing runs until
/// [`load`](DataGetter::load) is awaited.
#[derive(Clone)]
pub struct DataGetter {
    source_path: String,
    loader: DataLoader,
    api: Arc<dyn PageDataApi>,
}

impl DataGetter {
    /// Bind a loader, owned by the file at `source_path`, to an API instance.
    pub fn new(source_path: impl Into<String>, loader: DataLoader, api: Arc<dyn PageDataApi>) -> Self {
        Self {
            source_path: source_path.into(),
            loader,
            api,
        }
    }

    /// File that defined the loader.
    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    /// Run the loader. Failures are reported as [`SiteError::DataLoader`]
    /// naming the owning file.
    pub async fn load(&self) -> Result<JsonValue> {
        (self.loader)(Arc::clone(&self.api))
            .await
            .map_err(|err| match err {
                SiteError::DataLoader { .. } => err,
                other => SiteError::DataLoader {
                    source_path: self.source_path.clone(),
                    message: other.to_string(),
                },
            })
    }
}

impl fmt::Debug for DataGetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataGetter")
            .field("source_path", &self.source_path)
            .finish_non_exhaustive()
    }
}
