//! Manifest sources.
//!
//! A source yields the raw manifest payload; normalization happens in the
//! controller so the raw payload can be cached as fetched.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Default manifest location, relative to the catalog root.
pub const DEFAULT_MANIFEST: &str = "data/pdfs.json";

/// Query parameter appended to bypass intermediate HTTP caches.
const CACHE_BUST_PARAM: &str = "_";

const USER_AGENT: &str = concat!("pdfshelf/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur while loading the manifest.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Request could not be sent or the body could not be read.
    #[error("Network error: {0}")]
    Network(String),
    /// Server answered with a non-success status.
    #[error("HTTP {0}")]
    Status(u16),
    /// Deadline elapsed; the in-flight request was dropped.
    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    /// Body is not valid JSON or not an accepted manifest shape.
    #[error("Invalid manifest: {0}")]
    Parse(String),
}

/// Coarse classification of a [`FetchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Network,
    Status,
    Timeout,
    Parse,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Network(_) => FetchErrorKind::Network,
            FetchError::Status(_) => FetchErrorKind::Status,
            FetchError::Timeout(_) => FetchErrorKind::Timeout,
            FetchError::Parse(_) => FetchErrorKind::Parse,
        }
    }

    fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(timeout)
        } else if err.is_decode() {
            FetchError::Parse(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

/// Something the manifest can be fetched from.
#[async_trait]
pub trait ManifestSource: Send + Sync {
    /// Human-readable location, for logs.
    fn location(&self) -> String;

    /// Fetch and decode the raw manifest payload.
    async fn fetch(&self) -> Result<Value, FetchError>;
}

/// Fetches the manifest over HTTP with a hard deadline.
#[derive(Clone)]
pub struct HttpManifestSource {
    client: Client,
    url: Url,
    timeout: Duration,
    cache_bust: bool,
}

impl HttpManifestSource {
    /// Create a source for `url` using the default user agent.
    pub fn new(url: Url, timeout: Duration) -> Result<Self, FetchError> {
        Self::with_user_agent(url, timeout, None)
    }

    /// Create a source with a custom user agent (None = default).
    pub fn with_user_agent(
        url: Url,
        timeout: Duration,
        user_agent: Option<&str>,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(user_agent.unwrap_or(USER_AGENT))
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| FetchError::Network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url,
            timeout,
            cache_bust: true,
        })
    }

    /// Enable or disable the cache-busting query parameter.
    pub fn with_cache_bust(mut self, cache_bust: bool) -> Self {
        self.cache_bust = cache_bust;
        self
    }

    /// URL actually requested, including the cache-busting parameter.
    pub fn request_url(&self) -> Url {
        let mut url = self.url.clone();
        if self.cache_bust {
            let stamp = chrono::Utc::now().timestamp_millis().to_string();
            url.query_pairs_mut().append_pair(CACHE_BUST_PARAM, &stamp);
        }
        url
    }

    async fn fetch_json(&self, url: Url) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(e, self.timeout))?;

        serde_json::from_slice(&body).map_err(|e| FetchError::Parse(e.to_string()))
    }
}

#[async_trait]
impl ManifestSource for HttpManifestSource {
    fn location(&self) -> String {
        self.url.to_string()
    }

    async fn fetch(&self) -> Result<Value, FetchError> {
        let url = self.request_url();
        debug!("Fetching manifest from {}", url);

        let start = Instant::now();
        // Dropping the inner future on expiry aborts the request.
        let result = match tokio::time::timeout(self.timeout, self.fetch_json(url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.timeout)),
        };

        match &result {
            Ok(_) => debug!("Manifest fetched in {}ms", start.elapsed().as_millis()),
            Err(e) => warn!("Manifest fetch from {} failed: {}", self.url, e),
        }
        result
    }
}

/// Reads the manifest from a local file.
#[derive(Debug, Clone)]
pub struct FileManifestSource {
    path: PathBuf,
}

impl FileManifestSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ManifestSource for FileManifestSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Value, FetchError> {
        debug!("Reading manifest from {}", self.path.display());
        let body = tokio::fs::read(&self.path)
            .await
            .map_err(|e| FetchError::Network(format!("{}: {}", self.path.display(), e)))?;

        serde_json::from_slice(&body).map_err(|e| FetchError::Parse(e.to_string()))
    }
}

/// Resolve a manifest location into a source.
///
/// Absolute `http(s)` URLs are fetched directly. Relative locations are
/// joined onto `base_url` when one is given, otherwise read from disk.
pub fn source_for(
    location: &str,
    base_url: Option<&str>,
    timeout: Duration,
    user_agent: Option<&str>,
    cache_bust: bool,
) -> Result<Box<dyn ManifestSource>, FetchError> {
    let url = if is_http_url(location) {
        Some(Url::parse(location).map_err(|e| FetchError::Network(e.to_string()))?)
    } else if let Some(base) = base_url {
        let base = Url::parse(base).map_err(|e| FetchError::Network(e.to_string()))?;
        Some(
            base.join(location.trim_start_matches('/'))
                .map_err(|e| FetchError::Network(e.to_string()))?,
        )
    } else {
        None
    };

    match url {
        Some(url) => Ok(Box::new(
            HttpManifestSource::with_user_agent(url, timeout, user_agent)?.with_cache_bust(cache_bust),
        )),
        None => Ok(Box::new(FileManifestSource::new(location))),
    }
}

/// Whether `s` starts with `http://` or `https://`, ignoring case.
pub fn is_http_url(s: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        s.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("https://example.com/a.pdf"));
        assert!(is_http_url("HTTP://EXAMPLE.COM"));
        assert!(!is_http_url("ftp://example.com"));
        assert!(!is_http_url("/pdf/a.pdf"));
        assert!(!is_http_url("http:/broken"));
        assert!(!is_http_url("ht"));
    }

    #[test]
    fn test_request_url_appends_cache_bust() {
        let url = Url::parse("https://example.com/data/pdfs.json").unwrap();
        let source = HttpManifestSource::new(url, Duration::from_secs(1)).unwrap();
        let requested = source.request_url();
        assert!(requested.query_pairs().any(|(k, _)| k == CACHE_BUST_PARAM));

        let plain = source.with_cache_bust(false).request_url();
        assert_eq!(plain.query(), None);
    }

    #[test]
    fn test_source_for_joins_relative_location_onto_base() {
        let source = source_for(
            "/data/pdfs.json",
            Some("https://docs.example.com/catalog/"),
            Duration::from_secs(1),
            None,
            true,
        )
        .unwrap();
        assert_eq!(
            source.location(),
            "https://docs.example.com/catalog/data/pdfs.json"
        );
    }

    #[test]
    fn test_source_for_local_path() {
        let source = source_for(DEFAULT_MANIFEST, None, Duration::from_secs(1), None, true).unwrap();
        assert_eq!(source.location(), DEFAULT_MANIFEST);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(FetchError::Status(404).kind(), FetchErrorKind::Status);
        assert_eq!(
            FetchError::Timeout(Duration::from_millis(8000)).to_string(),
            "Request timed out after 8000ms"
        );
    }

    #[tokio::test]
    async fn test_file_source_missing_file_is_network_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileManifestSource::new(dir.path().join("absent.json"));
        let err = source.fetch().await.unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Network);
    }
}
