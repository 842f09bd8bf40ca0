//! Display preferences
//!
//! Persisted separately from the habit list, one key per preference.

use crate::consts::THEME_KEY;
use crate::persistence::KeyValueStore;

/// Colour scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    /// A saved choice wins over the system preference
    pub fn resolve(saved: Option<Theme>, prefers_dark: bool) -> Self {
        match saved {
            Some(theme) => theme,
            None if prefers_dark => Theme::Dark,
            None => Theme::Light,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Label for the toggle button (shows what you switch to)
    pub fn toggle_icon(&self) -> &'static str {
        match self {
            Theme::Light => "🌙",
            Theme::Dark => "☀️",
        }
    }

    pub fn is_dark(&self) -> bool {
        *self == Theme::Dark
    }

    /// Saved choice, if the user ever made one
    pub fn load_saved<K: KeyValueStore>(storage: &K) -> Option<Self> {
        match storage.get_item(THEME_KEY) {
            Ok(Some(value)) => {
                let theme = Self::from_str(&value);
                if theme.is_none() {
                    log::warn!("Ignoring unknown saved theme {value:?}");
                }
                theme
            }
            Ok(None) => None,
            Err(e) => {
                log::warn!("Could not read theme: {e}");
                None
            }
        }
    }

    /// Resolve the theme to apply on startup
    pub fn load<K: KeyValueStore>(storage: &K, prefers_dark: bool) -> Self {
        let theme = Self::resolve(Self::load_saved(storage), prefers_dark);
        log::info!("Using {} theme", theme.as_str());
        theme
    }

    pub fn save<K: KeyValueStore>(&self, storage: &K) {
        match storage.set_item(THEME_KEY, self.as_str()) {
            Ok(()) => log::info!("Theme saved ({})", self.as_str()),
            Err(e) => log::warn!("Could not save theme: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_resolve_prefers_saved_choice() {
        assert_eq!(Theme::resolve(Some(Theme::Light), true), Theme::Light);
        assert_eq!(Theme::resolve(Some(Theme::Dark), false), Theme::Dark);
        assert_eq!(Theme::resolve(None, true), Theme::Dark);
        assert_eq!(Theme::resolve(None, false), Theme::Light);
    }

    #[test]
    fn test_toggle_and_icon() {
        assert_eq!(Theme::Light.toggle(), Theme::Dark);
        assert_eq!(Theme::Dark.toggle().toggle(), Theme::Dark);
        assert_eq!(Theme::Dark.toggle_icon(), "☀️");
        assert_eq!(Theme::Light.toggle_icon(), "🌙");
    }

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        assert_eq!(Theme::load(&storage, true), Theme::Dark);

        Theme::Light.save(&storage);
        assert_eq!(storage.get_item(THEME_KEY).unwrap().as_deref(), Some("light"));
        assert_eq!(Theme::load(&storage, true), Theme::Light);
    }

    #[test]
    fn test_garbage_falls_back_to_system() {
        let storage = MemoryStorage::new();
        storage.set_item(THEME_KEY, "sepia").unwrap();
        assert_eq!(Theme::load(&storage, true), Theme::Dark);

        storage.set_fail_reads(true);
        assert_eq!(Theme::load(&storage, false), Theme::Light);
    }
}
