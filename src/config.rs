//! Environment configuration

use std::time::Duration;
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub commerce: CommerceApiConfig,
}

#[derive(Clone, Debug)]
pub struct CommerceApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
    pub categories_path: String,
    pub products_path: String,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> { Self::from_lookup(|key| std::env::var(key).ok()) }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let port = match get("PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid { key: "PORT", value: v })?,
            None => 8083,
        };
        let base_url = get("COMMERCE_API_URL").ok_or(ConfigError::Missing("COMMERCE_API_URL"))?;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Invalid { key: "COMMERCE_API_URL", value: base_url });
        }
        let timeout = match get("COMMERCE_API_TIMEOUT_SECS") {
            Some(v) => match v.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::Invalid { key: "COMMERCE_API_TIMEOUT_SECS", value: v }),
            },
            None => Duration::from_secs(10),
        };
        Ok(Self {
            port,
            commerce: CommerceApiConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                token: get("COMMERCE_API_TOKEN"),
                timeout,
                categories_path: get("COMMERCE_CATEGORIES_PATH").unwrap_or_else(|| "/api/category".to_string()),
                products_path: get("COMMERCE_PRODUCTS_PATH").unwrap_or_else(|| "/api/product".to_string()),
            },
        })
    }
}
