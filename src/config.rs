//! Configuration management for the explorer

use crate::cache::BlockCache;
use crate::error::{ExplorerError, Result};
use crate::pagination::DISPLAY_PER_PAGE;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "explorer.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub node: NodeConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NodeConfig {
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Launcher `/status` endpoint. When unset the network is assumed running.
    #[serde(default)]
    pub status_url: Option<String>,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            status_url: None,
            request_timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

fn default_rpc_url() -> String {
    "http://localhost/node-1/rpc".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_page_size() -> usize {
    DISPLAY_PER_PAGE
}

fn default_cache_capacity() -> usize {
    BlockCache::DEFAULT_CAPACITY
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.node.rpc_url.trim().is_empty() {
            return Err(ExplorerError::Config("node.rpc_url must be set".to_string()));
        }
        if self.node.request_timeout_secs == 0 {
            return Err(ExplorerError::Config(
                "node.request_timeout_secs must be positive".to_string(),
            ));
        }
        if self.display.page_size == 0 {
            return Err(ExplorerError::Config(
                "display.page_size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.node.request_timeout_secs)
    }
}

/// Load `explorer.toml` from the working directory.
pub fn load_config() -> Result<Config> {
    load_config_from(DEFAULT_CONFIG_PATH)
}

/// Load and validate a config file. A missing file yields the defaults.
pub fn load_config_from(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let config: Config = match fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).map_err(|e| {
            ExplorerError::Config(format!("parsing `{}` as TOML: {}", path.display(), e))
        })?,
        Err(e) if e.kind() == ErrorKind::NotFound => Config::default(),
        Err(e) => {
            return Err(ExplorerError::Config(format!(
                "reading config file `{}`: {}",
                path.display(),
                e
            )))
        }
    };

    config.validate()?;
    Ok(config)
}
