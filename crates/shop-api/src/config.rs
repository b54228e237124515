//! API client configuration.

use crate::error::ConfigError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "SHOP_API_URL";

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Backend origin plus the `/api` prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout for ordinary calls, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Timeout for file uploads, in milliseconds.
    #[serde(default = "default_upload_timeout_ms")]
    pub upload_timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_upload_timeout_ms() -> u64 {
    30_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            upload_timeout_ms: default_upload_timeout_ms(),
        }
    }
}

impl ApiConfig {
    /// Create a config for a base URL with default timeouts.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Timeout for ordinary calls.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Timeout for file uploads.
    pub fn upload_timeout(&self) -> Duration {
        Duration::from_millis(self.upload_timeout_ms)
    }

    /// Apply `SHOP_API_URL` if it is set and non-empty.
    pub fn with_env_overrides(self) -> Self {
        self.with_base_url_override(std::env::var(BASE_URL_ENV).ok())
    }

    fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        self
    }

    /// Join a request path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Load a config file, TOML or JSON by extension.
pub fn load_config<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&content, path)
}

/// Parse config text; `path` only picks the format and names errors.
pub fn parse_config<T: DeserializeOwned>(content: &str, path: &Path) -> Result<T, ConfigError> {
    let parsed: Result<T, String> = if is_json(path) {
        serde_json::from_str(content).map_err(|e| e.to_string())
    } else {
        toml::from_str(content).map_err(|e| e.to_string())
    };
    parsed.map_err(|message| ConfigError::Parse {
        path: path.display().to_string(),
        message,
    })
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080/api");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.upload_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_parse_toml_partial() {
        let config: ApiConfig =
            parse_config("base_url = \"https://shop.example/api\"", Path::new("shop.toml"))
                .unwrap();
        assert_eq!(config.base_url, "https://shop.example/api");
        assert_eq!(config.timeout_ms, 10_000);
    }

    #[test]
    fn test_parse_json() {
        let config: ApiConfig =
            parse_config(r#"{"timeout_ms": 500}"#, Path::new("api.JSON")).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/api");
        assert_eq!(config.timeout(), Duration::from_millis(500));
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config::<ApiConfig>("timeout_ms = \"soon\"", Path::new("shop.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config::<ApiConfig>("/nonexistent/shop.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_base_url_override() {
        let config = ApiConfig::default().with_base_url_override(Some("http://10.0.0.2/api ".into()));
        assert_eq!(config.base_url, "http://10.0.0.2/api");

        let config = ApiConfig::default().with_base_url_override(Some("  ".into()));
        assert_eq!(config.base_url, "http://localhost:8080/api");
    }

    #[test]
    fn test_url_join() {
        let config = ApiConfig::new("http://localhost:8080/api/");
        assert_eq!(config.url("/goods/1"), "http://localhost:8080/api/goods/1");
        assert_eq!(config.url("cart"), "http://localhost:8080/api/cart");
    }
}
