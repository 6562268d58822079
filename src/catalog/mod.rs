//! Catalog loading, filtering and state management.
//!
//! The controller drives a load cycle (cache, then network), owns the
//! filter state and preferences, and hands rendered snapshots to a
//! [`RenderTarget`].

pub mod cache;
pub mod controller;
pub mod filter;
pub mod loader;
pub mod manifest;

pub use cache::ManifestCache;
pub use controller::{CatalogController, CatalogState, CatalogView, LoadState, Origin, RenderTarget};
pub use filter::{categories, filter};
pub use loader::{FetchError, FetchErrorKind, FileManifestSource, HttpManifestSource, ManifestSource};
pub use manifest::{normalize_manifest, parse_manifest};
