//! Startup configuration, read from `amity.toml`.
//!
//! ```toml
//! [store]
//! url = "${REDIS_URL}"
//! prefix = "amity"
//! service = "social"
//!
//! [engagement]
//! max_conflict_retries = 5
//!
//! [assets]
//! base_url = "http://localhost:3001/assets"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("environment variable {name} not set")]
    MissingEnv { name: String },

    #[error("invalid {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AmityConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub engagement: EngagementConfig,
    #[serde(default)]
    pub assets: AssetConfig,
}

impl AmityConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AmityConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Loads `path` when it exists, otherwise falls back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("{} not found, using default configuration", path.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engagement.max_conflict_retries == 0 {
            return Err(ConfigError::Invalid {
                field: "engagement.max_conflict_retries",
                message: "must be at least 1".to_string(),
            });
        }
        if self.store.prefix.trim().is_empty() || self.store.service.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "store.prefix",
                message: "prefix and service must not be empty".to_string(),
            });
        }
        Url::parse(&self.assets.base_url).map_err(|err| ConfigError::Invalid {
            field: "assets.base_url",
            message: err.to_string(),
        })?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_url")]
    pub url: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_service")]
    pub service: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: default_store_url(),
            prefix: default_prefix(),
            service: default_service(),
        }
    }
}

fn default_store_url() -> String {
    "${REDIS_URL}".to_string()
}

fn default_prefix() -> String {
    "amity".to_string()
}

fn default_service() -> String {
    "social".to_string()
}

impl StoreConfig {
    /// Returns the store URL, expanding a `${VAR}` value from the environment.
    pub fn resolved_url(&self) -> Result<String, ConfigError> {
        expand_env_with(&self.url, |name| std::env::var(name).ok())
    }
}

/// Expands a value of the form `${VAR}` using `lookup`; other values pass through.
pub fn expand_env_with<F>(value: &str, lookup: F) -> Result<String, ConfigError>
where
    F: FnOnce(&str) -> Option<String>,
{
    match value.strip_prefix("${").and_then(|rest| rest.strip_suffix('}')) {
        Some(name) => lookup(name).ok_or_else(|| ConfigError::MissingEnv { name: name.to_string() }),
        None => Ok(value.to_string()),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementConfig {
    /// Attempts made by a like toggle before a version conflict is reported as unavailability.
    #[serde(default = "default_max_conflict_retries")]
    pub max_conflict_retries: u32,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            max_conflict_retries: default_max_conflict_retries(),
        }
    }
}

fn default_max_conflict_retries() -> u32 {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    #[serde(default = "default_asset_base_url")]
    pub base_url: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            base_url: default_asset_base_url(),
        }
    }
}

fn default_asset_base_url() -> String {
    "http://localhost:3001/assets".to_string()
}

impl AssetConfig {
    /// Resolves a stored picture reference to a URL. Absolute references pass through.
    pub fn asset_url(&self, picture_ref: &str) -> Option<String> {
        let picture_ref = picture_ref.trim();
        if picture_ref.is_empty() {
            return None;
        }
        if Url::parse(picture_ref).is_ok() {
            return Some(picture_ref.to_string());
        }
        Some(format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            picture_ref.trim_start_matches('/')
        ))
    }
}
