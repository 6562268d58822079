//! Core data types for the document catalog.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Display title used when an entry has no usable title.
pub const UNTITLED: &str = "Tanpa judul";

/// Category assigned to entries without one.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Category sentinel that matches every entry.
pub const ALL_CATEGORIES: &str = "all";

/// Label shown for the [`ALL_CATEGORIES`] option.
pub const ALL_CATEGORIES_LABEL: &str = "Semua Kategori";

/// Shown wherever a timestamp is missing or cannot be parsed.
pub const NO_DATE: &str = "-";

/// One catalog entry, normalized from whatever shape the manifest used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentItem {
    pub title: String,
    pub description: String,
    pub category: String,
    pub url: String,
    pub preview_url: Option<String>,
    pub updated_at: Option<String>,
}

impl DocumentItem {
    /// Create an item with only a title and link; other fields take their defaults.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            category: UNCATEGORIZED.to_string(),
            url: url.into(),
            preview_url: None,
            updated_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_preview(mut self, preview_url: impl Into<String>) -> Self {
        self.preview_url = Some(preview_url.into());
        self
    }

    pub fn with_updated_at(mut self, updated_at: impl Into<String>) -> Self {
        self.updated_at = Some(updated_at.into());
        self
    }

    /// Link target for the "open" action: the document URL, or the preview
    /// when the document has no URL of its own.
    pub fn open_url(&self) -> Option<&str> {
        if !self.url.is_empty() {
            Some(&self.url)
        } else {
            self.preview_url.as_deref().filter(|p| !p.is_empty())
        }
    }
}

/// A loaded manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub items: Vec<DocumentItem>,
    /// Raw manifest-level update time, if the envelope carried one.
    pub updated_at: Option<String>,
}

/// Distinct categories across a set of items, sorted, headed by [`ALL_CATEGORIES`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySet(Vec<String>);

impl CategorySet {
    pub(crate) fn from_sorted(categories: Vec<String>) -> Self {
        let mut values = Vec::with_capacity(categories.len() + 1);
        values.push(ALL_CATEGORIES.to_string());
        values.extend(categories);
        Self(values)
    }

    /// Category values including the leading sentinel.
    pub fn values(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, category: &str) -> bool {
        self.0.iter().any(|c| c == category)
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        Self::from_sorted(Vec::new())
    }
}

/// Color theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Glyph shown on the theme toggle button.
    pub fn icon(&self) -> &'static str {
        match self {
            Theme::Dark => "🌙",
            Theme::Light => "☀️",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme: {}", other)),
        }
    }
}

/// Layout used to render the result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Grid => ViewMode::List,
            ViewMode::List => ViewMode::Grid,
        }
    }

    /// Glyph shown on the view toggle button.
    pub fn icon(&self) -> &'static str {
        match self {
            ViewMode::Grid => "⬛⬛",
            ViewMode::List => "☰",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grid" => Ok(ViewMode::Grid),
            "list" => Ok(ViewMode::List),
            other => Err(format!("unknown view mode: {}", other)),
        }
    }
}

/// Persisted UI preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preferences {
    pub theme: Theme,
    pub view_mode: ViewMode,
}
