//! Configuration schema for package-size
//!
//! Configuration is stored at `~/.config/package-size/config.toml`

use crate::install::InstallClient;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Package installation settings
    pub install: InstallConfig,

    /// Bundler settings
    pub bundler: BundlerConfig,

    /// Size cache settings
    pub cache: CacheConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Installer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Package manager: auto, yarn or npm
    pub client: InstallClient,

    /// Registry URL passed to the package manager
    pub registry: Option<String>,
}

/// Bundler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BundlerConfig {
    /// esbuild executable
    pub command: String,

    /// gzip level for the compressed size (0-9)
    pub gzip_level: u32,
}

impl Default for BundlerConfig {
    fn default() -> Self {
        Self {
            command: "esbuild".to_string(),
            gzip_level: 9,
        }
    }
}

/// Size cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Serve repeated measurements from the cache (default: true)
    pub enabled: bool,

    /// Cache file location (default: user cache dir)
    pub path: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}
