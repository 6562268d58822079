//! pdfshelf - browse a JSON manifest of PDF documents.
//!
//! Loads a manifest (bare array or `{ updatedAt, items }` envelope), filters
//! it by text and category, and renders it as a card grid or row list.
//! Theme and layout preferences persist in a local SQLite store.

pub mod catalog;
pub mod config;
pub mod models;
pub mod render;
pub mod server;
pub mod storage;

pub use catalog::{CatalogController, CatalogView, FetchError, RenderTarget};
pub use config::Settings;
pub use models::{DocumentItem, Manifest, Preferences, Theme, ViewMode};
