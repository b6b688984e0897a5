use std::fmt;
use std::sync::Arc;

use uyghurly_core::storage::KeyValueStore;

use crate::error::ProgressError;

pub const THEME_KEY: &str = "uyghurly-theme";
pub const FONT_SIZE_KEY: &str = "uyghurly-font-size";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
    /// Follow the system preference
    Auto,
}

impl Theme {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            "auto" => Some(Theme::Auto),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Auto => "auto",
        }
    }

    pub fn is_dark(&self, system_prefers_dark: bool) -> bool {
        match self {
            Theme::Light => false,
            Theme::Dark => true,
            Theme::Auto => system_prefers_dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "small" => Some(FontSize::Small),
            "medium" => Some(FontSize::Medium),
            "large" => Some(FontSize::Large),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FontSize::Small => "small",
            FontSize::Medium => "medium",
            FontSize::Large => "large",
        }
    }

    /// Root font size in pixels
    pub fn pixels(&self) -> u32 {
        match self {
            FontSize::Small => 14,
            FontSize::Medium => 16,
            FontSize::Large => 18,
        }
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display preferences kept as plain strings in local storage
#[derive(Clone)]
pub struct Settings {
    store: Arc<dyn KeyValueStore>,
}

impl Settings {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored theme; unknown values fall back to the default
    pub fn theme(&self) -> Result<Theme, ProgressError> {
        Ok(self
            .store
            .get(THEME_KEY)?
            .and_then(|v| Theme::parse(&v))
            .unwrap_or_default())
    }

    pub fn set_theme(&self, theme: Theme) -> Result<(), ProgressError> {
        self.store.set(THEME_KEY, theme.as_str())?;
        Ok(())
    }

    pub fn font_size(&self) -> Result<FontSize, ProgressError> {
        Ok(self
            .store
            .get(FONT_SIZE_KEY)?
            .and_then(|v| FontSize::parse(&v))
            .unwrap_or_default())
    }

    pub fn set_font_size(&self, size: FontSize) -> Result<(), ProgressError> {
        self.store.set(FONT_SIZE_KEY, size.as_str())?;
        Ok(())
    }

    /// Theme back to auto, font back to medium
    pub fn reset_to_defaults(&self) -> Result<(), ProgressError> {
        self.set_theme(Theme::Auto)?;
        self.set_font_size(FontSize::Medium)
    }
}

#[cfg(test)]
mod tests {
    use uyghurly_core::MemoryStore;

    use super::*;

    #[test]
    fn defaults_when_unset_or_invalid() {
        let store = Arc::new(MemoryStore::new());
        let settings = Settings::new(store.clone());
        assert_eq!(settings.theme().unwrap(), Theme::Light);
        assert_eq!(settings.font_size().unwrap(), FontSize::Medium);

        store.set(FONT_SIZE_KEY, "huge").unwrap();
        store.set(THEME_KEY, "sepia").unwrap();
        assert_eq!(settings.font_size().unwrap(), FontSize::Medium);
        assert_eq!(settings.theme().unwrap(), Theme::Light);
    }

    #[test]
    fn values_persist_as_plain_strings() {
        let store = Arc::new(MemoryStore::new());
        let settings = Settings::new(store.clone());

        settings.set_theme(Theme::Dark).unwrap();
        settings.set_font_size(FontSize::Large).unwrap();

        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(settings.font_size().unwrap(), FontSize::Large);

        settings.reset_to_defaults().unwrap();
        assert_eq!(settings.theme().unwrap(), Theme::Auto);
        assert_eq!(settings.font_size().unwrap(), FontSize::Medium);
    }

    #[test]
    fn auto_theme_follows_system() {
        assert!(Theme::Auto.is_dark(true));
        assert!(!Theme::Auto.is_dark(false));
        assert!(Theme::Dark.is_dark(false));
        assert_eq!(Theme::parse(" DARK "), Some(Theme::Dark));
    }
}
