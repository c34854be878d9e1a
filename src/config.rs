use serde::Deserialize;
use std::fs;
use thiserror::Error;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Base address for API resources, e.g. "https://api.reverb.com/api".
    pub api_base_address: String,
    /// Host prepended to relative pagination cursors, e.g. "https://api.reverb.com".
    pub api_host: String,
    /// Category slugs to scan for deals.
    pub categories: Vec<String>,
    /// How many extra pages of price guides to load per category.
    #[serde(default)]
    pub extra_pages: u32,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
