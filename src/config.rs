use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::model::{ImageMode, Language};

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub language: Language,
    pub image_mode: ImageMode,
    /// Entries per page in the ranked result list.
    pub page_size: usize,
    pub api: ApiConfig,
}

/// Remote endpoint configuration. Overridable so tests can point the client
/// at a local mock server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub rest_base: String,
    pub graphql_url: String,
    pub sprite_base: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            image_mode: ImageMode::default(),
            page_size: 20,
            api: ApiConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            rest_base: "https://pokeapi.co/api/v2".to_string(),
            graphql_url: "https://beta.pokeapi.co/graphql/v1beta".to_string(),
            sprite_base: "https://raw.githubusercontent.com/PokeAPI/sprites/master".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/pokedex-engine/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse config at {}: {e} — using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {} — using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("pokedex-engine").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.page_size, 20);
        assert_eq!(config.language, Language::Fr);
        assert_eq!(config.image_mode, ImageMode::Artwork);
        assert!(config.api.rest_base.starts_with("https://pokeapi.co"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str("language = \"en\"").unwrap();
        assert_eq!(config.language, Language::En);
        assert_eq!(config.page_size, 20);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = AppConfig::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.page_size, config.page_size);
        assert_eq!(deserialized.api.rest_base, config.api.rest_base);
    }
}
