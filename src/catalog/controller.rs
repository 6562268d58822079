//! Catalog controller: owns the loaded items, the filter inputs and the
//! preferences, and produces rendered snapshots.

use std::sync::Arc;

use chrono::{Datelike, Utc};
use tracing::{error, info, warn};

use super::cache::ManifestCache;
use super::filter::{categories, filter};
use super::loader::{FetchError, ManifestSource};
use super::manifest::normalize_manifest;
use crate::models::{
    CategorySet, DocumentItem, Manifest, Preferences, Theme, ViewMode, ALL_CATEGORIES, NO_DATE,
};
use crate::render::{format_date, render};
use crate::storage::{KeyValueStore, PreferenceStore};

/// Where the currently shown items came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Cache,
    Network,
}

/// Progress of the current load cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready(Origin),
    /// Load failed and nothing could be shown; holds the error message.
    Failed(String),
}

/// Everything the catalog page is derived from.
#[derive(Debug, Clone)]
pub struct CatalogState {
    pub items: Vec<DocumentItem>,
    pub categories: CategorySet,
    pub updated_at: Option<String>,
    pub load_state: LoadState,
    pub query: String,
    pub category: String,
    pub preferences: Preferences,
}

impl CatalogState {
    fn new(preferences: Preferences) -> Self {
        Self {
            items: Vec::new(),
            categories: CategorySet::default(),
            updated_at: None,
            load_state: LoadState::Idle,
            query: String::new(),
            category: ALL_CATEGORIES.to_string(),
            preferences,
        }
    }
}

/// A rendered snapshot of the catalog, ready to be placed into a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogView {
    pub theme: Theme,
    pub view_mode: ViewMode,
    pub query: String,
    pub category: String,
    pub categories: Vec<String>,
    pub count: usize,
    /// Markup for the result list.
    pub items_html: String,
    pub empty: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub updated_label: String,
    pub year: i32,
}

impl CatalogView {
    pub fn count_label(&self) -> String {
        format!("{} dokumen", self.count)
    }
}

/// Receives snapshots as a load cycle progresses.
pub trait RenderTarget {
    fn present(&mut self, view: &CatalogView);
}

impl<F> RenderTarget for F
where
    F: FnMut(&CatalogView),
{
    fn present(&mut self, view: &CatalogView) {
        self(view)
    }
}

/// Drives loading, filtering and preference changes for one catalog.
pub struct CatalogController {
    source: Box<dyn ManifestSource>,
    cache: Option<ManifestCache>,
    preferences: PreferenceStore,
    state: CatalogState,
}

impl CatalogController {
    /// Create a controller, restoring persisted preferences from `store`.
    pub fn new(source: Box<dyn ManifestSource>, store: Arc<dyn KeyValueStore>) -> Self {
        let preferences = PreferenceStore::new(store);
        let state = CatalogState::new(preferences.get());

        Self {
            source,
            cache: None,
            preferences,
            state,
        }
    }

    /// Serve fresh cached manifests from `cache` before hitting the network.
    pub fn with_cache(mut self, cache: ManifestCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub fn preferences(&self) -> Preferences {
        self.state.preferences
    }

    /// Run one load cycle, presenting each intermediate snapshot to `target`.
    ///
    /// Persisted preferences are restored first.
    ///
    /// Never fails: errors end up in [`LoadState::Failed`] unless a cached
    /// manifest was already shown in this cycle, in which case the cached
    /// view stays.
    pub async fn load<T>(&mut self, target: &mut T)
    where
        T: RenderTarget + ?Sized,
    {
        // Another process may have changed them in the shared store.
        self.state.preferences = self.preferences.get();
        self.state.load_state = LoadState::Loading;
        target.present(&self.view());

        let served_cache = self.hydrate_from_cache();
        if served_cache {
            target.present(&self.view());
        }

        let location = self.source.location();
        let result = self
            .source
            .fetch()
            .await
            .and_then(|raw| normalize_manifest(&raw).map(|manifest| (raw, manifest)));

        match result {
            Ok((raw, manifest)) => {
                if let Some(cache) = &self.cache {
                    cache.write(&raw, Utc::now().timestamp_millis());
                }
                info!("Loaded {} documents from {}", manifest.items.len(), location);
                self.apply(manifest, Origin::Network);
            }
            Err(e) if served_cache => {
                warn!("Refresh from {} failed, keeping cached catalog: {}", location, e);
            }
            Err(e) => {
                error!("Failed to load manifest from {}: {}", location, e);
                self.fail(&e);
            }
        }

        target.present(&self.view());
    }

    fn hydrate_from_cache(&mut self) -> bool {
        let Some(cache) = &self.cache else {
            return false;
        };
        let Some(raw) = cache.read_fresh(Utc::now().timestamp_millis()) else {
            return false;
        };

        match normalize_manifest(&raw) {
            Ok(manifest) => {
                info!("Showing {} cached documents", manifest.items.len());
                self.apply(manifest, Origin::Cache);
                true
            }
            Err(e) => {
                warn!("Discarding cached manifest: {}", e);
                false
            }
        }
    }

    fn apply(&mut self, manifest: Manifest, origin: Origin) {
        self.state.categories = categories(&manifest.items);
        self.state.items = manifest.items;
        self.state.updated_at = manifest.updated_at;
        self.state.load_state = LoadState::Ready(origin);

        // Selection resets when its category disappears from the new set.
        if !self.state.categories.contains(&self.state.category) {
            self.state.category = ALL_CATEGORIES.to_string();
        }
    }

    fn fail(&mut self, error: &FetchError) {
        self.state.items.clear();
        self.state.categories = CategorySet::default();
        self.state.updated_at = None;
        self.state.category = ALL_CATEGORIES.to_string();
        self.state.load_state = LoadState::Failed(error.to_string());
    }

    pub fn set_query(&mut self, query: impl Into<String>) -> CatalogView {
        self.state.query = query.into();
        self.view()
    }

    /// Select a category; blank selects [`ALL_CATEGORIES`].
    pub fn set_category(&mut self, category: impl Into<String>) -> CatalogView {
        let category = category.into();
        self.state.category = if category.trim().is_empty() {
            ALL_CATEGORIES.to_string()
        } else {
            category
        };
        self.view()
    }

    pub fn toggle_theme(&mut self) -> CatalogView {
        let next = self.state.preferences.theme.toggled();
        self.state.preferences.theme = next;
        self.preferences.set_theme(next);
        info!("Theme set to {}", next);
        self.view()
    }

    pub fn toggle_view(&mut self) -> CatalogView {
        let next = self.state.preferences.view_mode.toggled();
        self.state.preferences.view_mode = next;
        self.preferences.set_view_mode(next);
        info!("View mode set to {}", next);
        self.view()
    }

    /// Items matching the current query and category, in manifest order.
    pub fn filtered(&self) -> Vec<&DocumentItem> {
        filter(&self.state.items, &self.state.query, &self.state.category)
    }

    /// Render the current state.
    pub fn view(&self) -> CatalogView {
        let state = &self.state;
        let loading = state.load_state == LoadState::Loading && state.items.is_empty();
        let error = match &state.load_state {
            LoadState::Failed(message) => Some(message.clone()),
            _ => None,
        };

        let filtered = if loading { Vec::new() } else { self.filtered() };

        CatalogView {
            theme: state.preferences.theme,
            view_mode: state.preferences.view_mode,
            query: state.query.clone(),
            category: state.category.clone(),
            categories: state.categories.values().to_vec(),
            count: filtered.len(),
            items_html: render(&filtered, state.preferences.view_mode),
            empty: !loading && filtered.is_empty(),
            loading,
            error,
            updated_label: state
                .updated_at
                .as_deref()
                .map(format_date)
                .unwrap_or_else(|| NO_DATE.to_string()),
            year: Utc::now().year(),
        }
    }
}
