use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf};

use crate::{
    model::{DEFAULT_CITY, DEFAULT_COUNTRY_CODE, WeatherQuery},
    provider::ProviderId,
};

/// Environment variable that supplies the OpenWeather key without touching the file.
pub const OPENWEATHER_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Credentials for a single provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
}

/// Base URLs of the upstream services.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Endpoints {
    pub openweather: String,
    pub geocoding: String,
    pub forecast: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            openweather: "https://api.openweathermap.org/data/2.5".to_string(),
            geocoding: "https://geocoding-api.open-meteo.com/v1".to_string(),
            forecast: "https://api.open-meteo.com/v1".to_string(),
        }
    }
}

/// Location used when the caller doesn't name one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct QueryDefaults {
    pub city: String,
    pub country_code: Option<String>,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            city: DEFAULT_CITY.to_string(),
            country_code: Some(DEFAULT_COUNTRY_CODE.to_string()),
        }
    }
}

fn default_language() -> String {
    "es".to_string()
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// language = "es"
///
/// [defaults]
/// city = "Medellín"
/// country_code = "CO"
///
/// [providers.openweather]
/// api_key = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub defaults: QueryDefaults,

    #[serde(default)]
    pub endpoints: Endpoints,

    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: default_language(),
            defaults: QueryDefaults::default(),
            endpoints: Endpoints::default(),
            providers: HashMap::new(),
        }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "plantcare", "plantcare-weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply overrides from an environment lookup (usually `std::env::var`).
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(OPENWEATHER_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.upsert_provider_api_key(ProviderId::OpenWeather, key.trim().to_string());
        }
        self
    }

    /// Set or replace a provider API key.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers.insert(provider_id.as_str().to_string(), ProviderConfig { api_key });
    }

    /// Forget a provider's credentials. Returns whether anything was stored.
    pub fn remove_provider(&mut self, provider_id: ProviderId) -> bool {
        self.providers.remove(provider_id.as_str()).is_some()
    }

    /// Returns API key for a provider, if present and non-blank.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.providers
            .get(provider_id.as_str())
            .map(|cfg| cfg.api_key.as_str())
            .filter(|key| !key.trim().is_empty())
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        !provider_id.requires_api_key() || self.provider_api_key(provider_id).is_some()
    }

    /// Build a query from optional caller input, filling gaps from `defaults`.
    ///
    /// An explicitly blank country code clears the default one.
    pub fn query(&self, city: Option<String>, country_code: Option<String>) -> WeatherQuery {
        let city = city
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| self.defaults.city.clone());

        WeatherQuery::new(city, country_code.or_else(|| self.defaults.country_code.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_services() {
        let cfg = Config::default();
        assert_eq!(cfg.language, "es");
        assert_eq!(cfg.endpoints.openweather, "https://api.openweathermap.org/data/2.5");
        assert_eq!(cfg.endpoints.geocoding, "https://geocoding-api.open-meteo.com/v1");
        assert_eq!(cfg.endpoints.forecast, "https://api.open-meteo.com/v1");
        assert!(!cfg.is_provider_configured(ProviderId::OpenWeather));
        assert!(cfg.is_provider_configured(ProviderId::OpenMeteo));
    }

    #[test]
    fn set_and_remove_api_key() {
        let mut cfg = Config::default();

        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "OPEN_KEY".into());
        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("OPEN_KEY"));
        assert!(cfg.is_provider_configured(ProviderId::OpenWeather));

        assert!(cfg.remove_provider(ProviderId::OpenWeather));
        assert!(!cfg.remove_provider(ProviderId::OpenWeather));
        assert!(!cfg.is_provider_configured(ProviderId::OpenWeather));
    }

    #[test]
    fn blank_api_key_counts_as_absent() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "   ".into());
        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), None);
    }

    #[test]
    fn env_override_replaces_file_key() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "FROM_FILE".into());

        let cfg = cfg.with_env_overrides(|name| {
            (name == OPENWEATHER_KEY_ENV).then(|| " FROM_ENV ".to_string())
        });
        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("FROM_ENV"));
    }

    #[test]
    fn empty_env_value_is_ignored() {
        let cfg = Config::default().with_env_overrides(|_| Some(String::new()));
        assert!(!cfg.is_provider_configured(ProviderId::OpenWeather));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = Config::from_toml(
            r#"
            [defaults]
            city = "Medellín"

            [providers.openweather]
            api_key = "abc"
            "#,
        )
        .expect("valid toml");

        assert_eq!(cfg.language, "es");
        assert_eq!(cfg.defaults.city, "Medellín");
        assert_eq!(cfg.defaults.country_code.as_deref(), Some("CO"));
        assert_eq!(cfg.endpoints, Endpoints::default());
        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("abc"));
    }

    #[test]
    fn toml_roundtrip() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "KEY".into());
        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let back = Config::from_toml(&text).expect("parse");
        assert_eq!(back.provider_api_key(ProviderId::OpenWeather), Some("KEY"));
        assert_eq!(back.defaults, cfg.defaults);
    }

    #[test]
    fn query_fills_from_defaults() {
        let cfg = Config::default();

        let q = cfg.query(None, None);
        assert_eq!(q.location_query(), "Cali,CO");

        let q = cfg.query(Some(" Lima ".into()), None);
        assert_eq!(q.location_query(), "Lima,CO");

        let q = cfg.query(Some("Lima".into()), Some(String::new()));
        assert_eq!(q.location_query(), "Lima");

        let q = cfg.query(Some("Lima".into()), Some("PE".into()));
        assert_eq!(q.location_query(), "Lima,PE");
    }
}
