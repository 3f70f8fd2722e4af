//! Application configuration.
//!
//! Stored in `.folio/config.yaml` (under `FOLIO_ROOT` when set):
//! - API base URL, path prefix and request timeout
//! - Search debounce delay
//! - Per-resource page size overrides

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_API_PREFIX;
use crate::domain::ResourceKind;
use crate::error::{FolioError, Result};
use crate::types::folio_root;

pub const API_URL_ENV: &str = "FOLIO_API_URL";

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "api.base_url",
    "api.prefix",
    "api.timeout_secs",
    "search.debounce_ms",
    "pages.<resource>",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default, skip_serializing_if = "SearchConfig::is_default")]
    pub search: SearchConfig,

    /// Page size overrides keyed by resource name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pages: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_prefix() -> String {
    DEFAULT_API_PREFIX.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            prefix: default_prefix(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Delay before typed search text is applied (default: 250)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    250
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl SearchConfig {
    pub fn is_default(&self) -> bool {
        self.debounce_ms == default_debounce_ms()
    }
}

fn invalid(key: &str, message: impl std::fmt::Display) -> FolioError {
    FolioError::Config(format!("invalid value for '{key}': {message}"))
}

impl Config {
    pub fn config_path() -> PathBuf {
        folio_root().join("config.yaml")
    }

    /// Load configuration from file, or return the default if there is none.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            FolioError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content).map_err(|e| {
            FolioError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to write config at {}: {}", path.display(), e),
            ))
        })?;
        Ok(())
    }

    /// API base URL from the environment or the config file.
    pub fn api_base_url(&self) -> String {
        if let Ok(url) = env::var(API_URL_ENV)
            && !url.is_empty()
        {
            return url;
        }
        self.api.base_url.clone()
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }

    /// Page size for `kind`: the configured override, else its default.
    pub fn page_size_for(&self, kind: ResourceKind) -> usize {
        self.pages
            .get(kind.as_str())
            .copied()
            .filter(|size| *size > 0)
            .unwrap_or_else(|| kind.default_page_size())
    }

    /// Read a value by dotted key. Returns `None` for an unset page override.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = match key {
            "api.base_url" => Some(self.api.base_url.clone()),
            "api.prefix" => Some(self.api.prefix.clone()),
            "api.timeout_secs" => Some(self.api.timeout_secs.to_string()),
            "search.debounce_ms" => Some(self.search.debounce_ms.to_string()),
            _ => match key.strip_prefix("pages.") {
                Some(resource) => {
                    let kind: ResourceKind = resource.parse()?;
                    self.pages.get(kind.as_str()).map(|size| size.to_string())
                }
                None => return Err(unknown_key(key)),
            },
        };
        Ok(value)
    }

    /// Validate and assign a value by dotted key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api.base_url" => {
                let url = url::Url::parse(value).map_err(|e| invalid(key, e))?;
                if !matches!(url.scheme(), "http" | "https") {
                    return Err(invalid(key, "expected an http or https URL"));
                }
                self.api.base_url = value.to_string();
            }
            "api.prefix" => {
                if !value.is_empty() && !value.starts_with('/') {
                    return Err(invalid(key, "prefix must start with '/'"));
                }
                self.api.prefix = value.trim_end_matches('/').to_string();
            }
            "api.timeout_secs" => {
                let secs: u64 = value.parse().map_err(|e| invalid(key, e))?;
                if secs == 0 {
                    return Err(invalid(key, "timeout must be at least 1 second"));
                }
                self.api.timeout_secs = secs;
            }
            "search.debounce_ms" => {
                self.search.debounce_ms = value.parse().map_err(|e| invalid(key, e))?;
            }
            _ => {
                let Some(resource) = key.strip_prefix("pages.") else {
                    return Err(unknown_key(key));
                };
                let kind: ResourceKind = resource.parse()?;
                let size: usize = value.parse().map_err(|e| invalid(key, e))?;
                if size == 0 {
                    return Err(invalid(key, "page size must be at least 1"));
                }
                self.pages.insert(kind.as_str().to_string(), size);
            }
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> FolioError {
    FolioError::Config(format!(
        "unknown config key '{key}'. Valid keys: {}",
        VALID_CONFIG_KEYS.join(", ")
    ))
}
