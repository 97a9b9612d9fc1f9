use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const MODEL_ENV: &str = "GEMINI_MODEL";
pub const API_BASE_ENV: &str = "GEMINI_API_BASE";

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

/// Settings for the local development server only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub model: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| crate::ProxyError::Internal(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| crate::ProxyError::Internal(format!("Failed to parse config file: {}", e)))
    }
}

impl UpstreamConfig {
    /// Defaults, overridden by `GEMINI_API_BASE` and `GEMINI_MODEL` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(base_url) = non_empty_var(API_BASE_ENV) {
            config.base_url = base_url;
        }
        if let Some(model) = non_empty_var(MODEL_ENV) {
            config.model = model;
        }
        config
    }

    /// `<base_url>/<model>:generateContent`, without the key.
    pub fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url.trim_end_matches('/'), self.model)
    }
}

/// Reads the upstream secret. Unset and empty are both treated as absent.
pub fn api_key_from_env() -> Option<SecretString> {
    non_empty_var(API_KEY_ENV).map(SecretString::new)
}

fn non_empty_var(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(v) if !v.is_empty() => Some(v),
        _ => None,
    }
}
