//! Configuration management for pdfshelf using the prefer crate.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::cache::DEFAULT_CACHE_TTL;
use crate::catalog::loader::{source_for, DEFAULT_MANIFEST};
use crate::catalog::{CatalogController, ManifestCache};
use crate::storage::{KeyValueStore, MemoryStore, SqliteStore};

/// Default manifest request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 8000;

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base data directory.
    pub data_dir: PathBuf,
    /// Database filename for preferences and the manifest cache.
    pub database_filename: String,
    /// Manifest location: URL, path relative to `base_url`, or local file.
    pub manifest: String,
    /// Base URL that relative manifest locations are resolved against.
    pub base_url: Option<String>,
    /// User agent for HTTP requests (None = default).
    pub user_agent: Option<String>,
    /// Manifest request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Whether to append a cache-busting query parameter.
    pub cache_bust: bool,
    /// Whether to serve fresh cached manifests before fetching.
    pub cache_enabled: bool,
    /// How long a cached manifest stays fresh, in seconds.
    pub cache_ttl_secs: u64,
    /// Preview server bind address.
    pub host: String,
    /// Preview server port.
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        // Default to the platform data dir, e.g. ~/.local/share/pdfshelf/
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("pdfshelf");

        Self {
            data_dir,
            database_filename: "pdfshelf.db".to_string(),
            manifest: DEFAULT_MANIFEST.to_string(),
            base_url: None,
            user_agent: None,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            cache_bust: true,
            cache_enabled: true,
            cache_ttl_secs: DEFAULT_CACHE_TTL.as_secs(),
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Settings {
    /// Create settings with a custom data directory.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            ..Default::default()
        }
    }

    /// Get the full path to the database.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_filename)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Ensure all directories exist.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.data_dir)
    }

    /// Open the preference/cache store, falling back to memory when the
    /// database cannot be opened.
    pub fn open_store(&self) -> Arc<dyn KeyValueStore> {
        if let Err(e) = self.ensure_directories() {
            warn!("Cannot create {}: {}; preferences will not persist", self.data_dir.display(), e);
            return Arc::new(MemoryStore::new());
        }

        match SqliteStore::new(&self.database_path()) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                warn!("Cannot open {}: {}; preferences will not persist", self.database_path().display(), e);
                Arc::new(MemoryStore::new())
            }
        }
    }

    /// Build a controller for the configured manifest.
    pub fn build_controller(&self, store: Arc<dyn KeyValueStore>) -> anyhow::Result<CatalogController> {
        let source = source_for(
            &self.manifest,
            self.base_url.as_deref(),
            self.request_timeout(),
            self.user_agent.as_deref(),
            self.cache_bust,
        )?;

        let controller = CatalogController::new(source, store.clone());
        Ok(if self.cache_enabled {
            controller.with_cache(ManifestCache::new(store, self.cache_ttl()))
        } else {
            controller
        })
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Target directory for data.
    #[serde(default)]
    pub target: Option<String>,
    /// Database filename.
    #[serde(default)]
    pub database: Option<String>,
    /// Manifest location.
    #[serde(default)]
    pub manifest: Option<String>,
    /// Base URL for relative manifest locations.
    #[serde(default)]
    pub base_url: Option<String>,
    /// User agent string.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Manifest request timeout in milliseconds.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
    /// Append a cache-busting query parameter to manifest requests.
    #[serde(default)]
    pub cache_bust: Option<bool>,
    /// Serve cached manifests while fresh.
    #[serde(default)]
    pub cache_enabled: Option<bool>,
    /// Cache freshness window in seconds.
    #[serde(default)]
    pub cache_ttl_secs: Option<u64>,
    /// Preview server host.
    #[serde(default)]
    pub host: Option<String>,
    /// Preview server port.
    #[serde(default)]
    pub port: Option<u16>,
}

impl Config {
    /// Load configuration using prefer crate.
    /// Automatically discovers pdfshelf config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("pdfshelf").await {
            Ok(pref_config) => {
                let target: Option<String> = pref_config.get("target").ok();
                let database: Option<String> = pref_config.get("database").ok();
                let manifest: Option<String> = pref_config.get("manifest").ok();
                let base_url: Option<String> = pref_config.get("base_url").ok();
                let user_agent: Option<String> = pref_config.get("user_agent").ok();
                let request_timeout_ms: Option<u64> =
                    pref_config.get("request_timeout_ms").ok();
                let cache_bust: Option<bool> = pref_config.get("cache_bust").ok();
                let cache_enabled: Option<bool> = pref_config.get("cache_enabled").ok();
                let cache_ttl_secs: Option<u64> = pref_config.get("cache_ttl_secs").ok();
                let host: Option<String> = pref_config.get("host").ok();
                let port: Option<u16> = pref_config.get("port").ok();

                Config {
                    target,
                    database,
                    manifest,
                    base_url,
                    user_agent,
                    request_timeout_ms,
                    cache_bust,
                    cache_enabled,
                    cache_ttl_secs,
                    host,
                    port,
                }
            }
            Err(_) => {
                // No config file found, use defaults
                Self::default()
            }
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref target) = self.target {
            let path = shellexpand::tilde(target);
            settings.data_dir = PathBuf::from(path.as_ref());
        }
        if let Some(ref database) = self.database {
            settings.database_filename = database.clone();
        }
        if let Some(ref manifest) = self.manifest {
            settings.manifest = manifest.clone();
        }
        if let Some(ref base_url) = self.base_url {
            settings.base_url = Some(base_url.clone());
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = Some(user_agent.clone());
        }
        if let Some(timeout) = self.request_timeout_ms {
            settings.request_timeout_ms = timeout;
        }
        if let Some(cache_bust) = self.cache_bust {
            settings.cache_bust = cache_bust;
        }
        if let Some(cache_enabled) = self.cache_enabled {
            settings.cache_enabled = cache_enabled;
        }
        if let Some(ttl) = self.cache_ttl_secs {
            settings.cache_ttl_secs = ttl;
        }
        if let Some(ref host) = self.host {
            settings.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
    }
}

/// Load settings from configuration (async version).
pub async fn load_settings() -> Settings {
    let config = Config::load().await;
    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    settings
}
