//! CLI configuration.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use shop_api::{load_config, ApiConfig};

/// File names searched for, in order, from the working directory upwards.
pub const CONFIG_NAMES: &[&str] = &["shop.toml", ".shop.toml", "shop.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Backend connection.
    #[serde(default)]
    pub api: ApiConfig,

    /// Local state.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(load_config(path)?)
    }

    #[cfg(test)]
    fn parse(content: &str, path: &Path) -> Result<Self> {
        Ok(shop_api::parse_config(content, path)?)
    }

    /// Find a config file in `start` or any parent directory.
    pub fn find(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            for name in CONFIG_NAMES {
                let candidate = current.join(name);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
            if !current.pop() {
                return None;
            }
        }
    }
}

/// Where the persistent storage scope lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file backing the persistent scope, relative to the config file
    /// or working directory.
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from(".shop").join("storage.json")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}
