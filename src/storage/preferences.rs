//! Theme and view-mode persistence.

use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, warn};

use super::KeyValueStore;
use crate::models::{Preferences, Theme, ViewMode};

pub const THEME_KEY: &str = "theme";
pub const VIEW_MODE_KEY: &str = "viewMode";

/// Reads and writes [`Preferences`]. Storage failures are logged and
/// otherwise ignored; reads fall back to the defaults.
#[derive(Clone)]
pub struct PreferenceStore {
    store: Arc<dyn KeyValueStore>,
}

impl PreferenceStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn get(&self) -> Preferences {
        Preferences {
            theme: self.read(THEME_KEY),
            view_mode: self.read(VIEW_MODE_KEY),
        }
    }

    pub fn theme(&self) -> Theme {
        self.read(THEME_KEY)
    }

    pub fn view_mode(&self) -> ViewMode {
        self.read(VIEW_MODE_KEY)
    }

    pub fn set_theme(&self, theme: Theme) {
        self.write(THEME_KEY, theme.as_str());
    }

    pub fn set_view_mode(&self, view_mode: ViewMode) {
        self.write(VIEW_MODE_KEY, view_mode.as_str());
    }

    /// Flip the stored theme and return the new value.
    pub fn toggle_theme(&self) -> Theme {
        let next = self.theme().toggled();
        self.set_theme(next);
        next
    }

    /// Flip the stored view mode and return the new value.
    pub fn toggle_view_mode(&self) -> ViewMode {
        let next = self.view_mode().toggled();
        self.set_view_mode(next);
        next
    }

    fn read<T: FromStr + Default>(&self, key: &str) -> T {
        match self.store.get(key) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|_| {
                debug!("Ignoring unknown {} value {:?}", key, raw);
                T::default()
            }),
            Ok(None) => T::default(),
            Err(e) => {
                warn!("Could not read preference {}: {}", key, e);
                T::default()
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            warn!("Could not persist preference {}: {}", key, e);
        }
    }
}
