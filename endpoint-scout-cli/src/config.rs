//! Configuration file loading.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use endpoint_scout_toolbox::{
    DiscoveryOptions, ProviderRegistry, DEFAULT_CONCURRENCY, DEFAULT_PROBE_TIMEOUT,
};
use serde::Deserialize;

pub const APP_NAME: &str = "endpoint-scout";
const CONFIG_FILE_NAME: &str = "config.json";

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct AppConfig {
    /// Provider → resolver servers. Falls back to the bundled registry.
    pub public_dns_servers: Option<ProviderRegistry>,
    pub probe_timeout_secs: u64,
    pub concurrency: usize,
    pub log_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            public_dns_servers: None,
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT.as_secs(),
            concurrency: DEFAULT_CONCURRENCY,
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl AppConfig {
    /// Load `explicit` if given, else the platform config file if it exists,
    /// else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// The effective provider registry, validated.
    pub fn registry(&self) -> Result<ProviderRegistry> {
        match &self.public_dns_servers {
            Some(registry) => Ok(registry.clone()),
            None => ProviderRegistry::bundled().context("Bundled provider registry is invalid"),
        }
    }

    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            concurrency: self.concurrency.max(1),
            probe_timeout: Duration::from_secs(self.probe_timeout_secs.max(1)),
        }
    }
}

/// `<config dir>/endpoint-scout/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILE_NAME))
}
