//! Light/dark theme preference
//!
//! The choice survives reloads through a durable key-value store (browser
//! local storage on the page).

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Storage key of the theme preference
pub const DARK_MODE_KEY: &str = "darkMode";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Class set on `<body>` while the theme is active
    pub fn body_class(self) -> Option<&'static str> {
        match self {
            Theme::Light => None,
            Theme::Dark => Some("dark-mode"),
        }
    }

    /// Icon shown on the toggle button
    pub fn icon_class(self) -> &'static str {
        match self {
            Theme::Light => "bi-moon",
            Theme::Dark => "bi-sun",
        }
    }

    fn stored_value(self) -> &'static str {
        match self {
            Theme::Light => "false",
            Theme::Dark => "true",
        }
    }
}

/// Durable string key-value store
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;

    /// Best effort; a store that refuses the write is ignored
    fn set(&self, key: &str, value: &str);
}

/// Theme saved in `store`, light if nothing usable is stored
pub fn restore_theme(store: &dyn PreferenceStore) -> Theme {
    match store.get(DARK_MODE_KEY).as_deref() {
        Some("true") => Theme::Dark,
        _ => Theme::Light,
    }
}

/// Flip `current`, persist the result and return it
pub fn toggle_theme(store: &dyn PreferenceStore, current: Theme) -> Theme {
    let next = current.toggled();
    store.set(DARK_MODE_KEY, next.stored_value());
    next
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_defaults_to_light() {
        let store = MemoryPreferenceStore::new();
        assert_eq!(restore_theme(&store), Theme::Light);

        store.set(DARK_MODE_KEY, "yes");
        assert_eq!(restore_theme(&store), Theme::Light);
    }

    #[test]
    fn test_toggle_persists() {
        let store = MemoryPreferenceStore::new();

        let theme = toggle_theme(&store, Theme::Light);
        assert_eq!(theme, Theme::Dark);
        assert_eq!(store.get(DARK_MODE_KEY).as_deref(), Some("true"));
        assert_eq!(restore_theme(&store), Theme::Dark);

        let theme = toggle_theme(&store, theme);
        assert_eq!(theme, Theme::Light);
        assert_eq!(store.get(DARK_MODE_KEY).as_deref(), Some("false"));
    }

    #[test]
    fn test_presentation() {
        assert_eq!(Theme::Dark.body_class(), Some("dark-mode"));
        assert_eq!(Theme::Light.body_class(), None);
        assert_eq!(Theme::Dark.icon_class(), "bi-sun");
        assert_eq!(Theme::Light.icon_class(), "bi-moon");
    }
}
