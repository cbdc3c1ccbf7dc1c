use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{EmsError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
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

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Km,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Km => "km",
        }
    }
}

const DATE_FORMATS: &[&str] = &["DD/MM/YYYY", "MM/DD/YYYY", "YYYY-MM-DD"];
const CURRENCIES: &[&str] = &["USD", "KHR"];

/// Display preferences. Missing keys in the file take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub language: Language,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Riels per kWh.
    #[serde(default = "default_electricity_rate")]
    pub electricity_rate: i64,
    #[serde(default = "default_institution")]
    pub institution: String,
    #[serde(default = "default_location")]
    pub location: String,
}

fn default_date_format() -> String {
    "DD/MM/YYYY".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_electricity_rate() -> i64 {
    610
}

fn default_institution() -> String {
    "វត្តឈូកវ៉ា".to_string()
}

fn default_location() -> String {
    "រាជធានីភ្នំពេញ".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            language: Language::default(),
            date_format: default_date_format(),
            currency: default_currency(),
            electricity_rate: default_electricity_rate(),
            institution: default_institution(),
            location: default_location(),
        }
    }
}

impl Settings {
    pub const KEYS: &'static [&'static str] =
        &["theme", "language", "date_format", "currency", "electricity_rate", "institution", "location"];

    pub fn get(&self, key: &str) -> Result<String> {
        Ok(match key {
            "theme" => self.theme.as_str().to_string(),
            "language" => self.language.as_str().to_string(),
            "date_format" => self.date_format.clone(),
            "currency" => self.currency.clone(),
            "electricity_rate" => self.electricity_rate.to_string(),
            "institution" => self.institution.clone(),
            "location" => self.location.clone(),
            _ => return Err(EmsError::UnknownSetting(key.to_string())),
        })
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = || EmsError::InvalidSetting { key: key.to_string(), value: value.to_string() };
        match key {
            "theme" => {
                self.theme = match value {
                    "light" => Theme::Light,
                    "dark" => Theme::Dark,
                    _ => return Err(invalid()),
                }
            }
            "language" => {
                self.language = match value {
                    "en" => Language::En,
                    "km" => Language::Km,
                    _ => return Err(invalid()),
                }
            }
            "date_format" => {
                if !DATE_FORMATS.contains(&value) {
                    return Err(invalid());
                }
                self.date_format = value.to_string();
            }
            "currency" => {
                let upper = value.to_ascii_uppercase();
                if !CURRENCIES.contains(&upper.as_str()) {
                    return Err(invalid());
                }
                self.currency = upper;
            }
            "electricity_rate" => {
                self.electricity_rate = value.parse().ok().filter(|r: &i64| *r > 0).ok_or_else(invalid)?;
            }
            "institution" => self.institution = value.to_string(),
            "location" => self.location = value.to_string(),
            _ => return Err(EmsError::UnknownSetting(key.to_string())),
        }
        Ok(())
    }

    /// The configured date format as a chrono pattern.
    pub fn chrono_date_format(&self) -> &'static str {
        match self.date_format.as_str() {
            "MM/DD/YYYY" => "%m/%d/%Y",
            "YYYY-MM-DD" => "%Y-%m-%d",
            _ => "%d/%m/%Y",
        }
    }
}

/// Where preferences are read from and written to. Commands take one of
/// these instead of touching the file directly.
pub trait SettingsStore {
    fn load(&self) -> Settings;
    fn save(&mut self, settings: &Settings) -> Result<()>;

    /// Flip light/dark, persist it, and return the new theme.
    fn toggle_theme(&mut self) -> Result<Theme> {
        let mut settings = self.load();
        settings.theme = settings.theme.toggled();
        self.save(&settings)?;
        Ok(settings.theme)
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("ems")
}

/// JSON file store, by default `~/.config/ems/settings.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Self {
        Self::new(config_dir().join("settings.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileStore {
    /// A missing or unreadable file yields defaults.
    fn load(&self) -> Settings {
        if !self.path.exists() {
            return Settings::default();
        }
        let content = std::fs::read_to_string(&self.path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "settings file unreadable, using defaults");
            Settings::default()
        })
    }

    fn save(&mut self, settings: &Settings) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, format!("{json}\n"))?;
        tracing::info!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

/// In-process store for tests.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    settings: Settings,
}

#[cfg(test)]
impl SettingsStore for MemoryStore {
    fn load(&self) -> Settings {
        self.settings.clone()
    }

    fn save(&mut self, settings: &Settings) -> Result<()> {
        self.settings = settings.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("settings.json"));
        let mut settings = Settings::default();
        settings.set("theme", "dark").unwrap();
        settings.set("institution", "Wat Chhuk Va").unwrap();
        store.save(&settings).unwrap();
        let loaded = store.load();
        assert_eq!(loaded.theme, Theme::Dark);
        assert_eq!(loaded.institution, "Wat Chhuk Va");
    }

    #[test]
    fn test_load_returns_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nope.json"));
        let s = store.load();
        assert_eq!(s, Settings::default());
        assert_eq!(s.electricity_rate, 610);
        assert_eq!(s.language, Language::En);
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"theme": "dark", "language": "km"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.theme, Theme::Dark);
        assert_eq!(s.language, Language::Km);
        assert_eq!(s.date_format, "DD/MM/YYYY");
        assert_eq!(s.currency, "USD");
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(FileStore::new(&path).load(), Settings::default());
    }

    #[test]
    fn test_save_creates_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deep").join("nested").join("settings.json");
        let mut store = FileStore::new(&nested);
        store.save(&Settings::default()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_set_validates_values() {
        let mut s = Settings::default();
        assert!(matches!(s.set("theme", "blue"), Err(EmsError::InvalidSetting { .. })));
        assert!(matches!(s.set("font", "x"), Err(EmsError::UnknownSetting(_))));
        assert!(s.set("electricity_rate", "-3").is_err());
        s.set("electricity_rate", "700").unwrap();
        s.set("currency", "khr").unwrap();
        s.set("date_format", "YYYY-MM-DD").unwrap();
        assert_eq!(s.get("electricity_rate").unwrap(), "700");
        assert_eq!(s.get("currency").unwrap(), "KHR");
        assert_eq!(s.chrono_date_format(), "%Y-%m-%d");
    }

    #[test]
    fn test_every_key_readable() {
        let s = Settings::default();
        for key in Settings::KEYS {
            assert!(s.get(key).is_ok(), "{key}");
        }
    }

    #[test]
    fn test_toggle_theme_persists() {
        let mut store = MemoryStore::default();
        assert_eq!(store.toggle_theme().unwrap(), Theme::Dark);
        assert_eq!(store.load().theme, Theme::Dark);
        assert_eq!(store.toggle_theme().unwrap(), Theme::Light);
    }
}
