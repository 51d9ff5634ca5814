//! Configuration management for package-size

pub mod schema;

pub use schema::Config;

use crate::error::{PkgSizeError, PkgSizeResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Environment variable overriding the cache directory
pub const CACHE_DIR_ENV: &str = "PACKAGE_SIZE_CACHE_DIR";

/// File name of the size cache inside the cache directory
const CACHE_FILE: &str = "cache.json";

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("package-size")
            .join("config.toml")
    }

    /// Get the cache directory path
    ///
    /// `PACKAGE_SIZE_CACHE_DIR` wins over the platform cache dir.
    pub fn cache_dir() -> PathBuf {
        Self::cache_dir_override().unwrap_or_else(|| {
            dirs::cache_dir()
                .or_else(dirs::data_local_dir)
                .unwrap_or_else(|| PathBuf::from("."))
                .join("package-size")
        })
    }

    /// Get the size cache file path, honoring `cache.path` from config
    pub fn cache_file(config: &Config) -> PathBuf {
        match (Self::cache_dir_override(), &config.cache.path) {
            (Some(dir), _) => dir.join(CACHE_FILE),
            (None, Some(path)) => path.clone(),
            (None, None) => Self::cache_dir().join(CACHE_FILE),
        }
    }

    fn cache_dir_override() -> Option<PathBuf> {
        std::env::var_os(CACHE_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    /// Load configuration, creating default if not exists
    pub async fn load(&self) -> PkgSizeResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> PkgSizeResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| PkgSizeError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| PkgSizeError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> PkgSizeResult<()> {
        let content = toml::to_string_pretty(config)?;
        self.write_raw(&content).await?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Read the config file as text, empty if it does not exist
    pub async fn read_raw(&self) -> PkgSizeResult<String> {
        if !self.config_path.exists() {
            return Ok(String::new());
        }
        fs::read_to_string(&self.config_path).await.map_err(|e| {
            PkgSizeError::io(format!("reading config from {}", self.config_path.display()), e)
        })
    }

    /// Write config text verbatim
    pub async fn write_raw(&self, content: &str) -> PkgSizeResult<()> {
        self.ensure_config_dir().await?;

        fs::write(&self.config_path, content).await.map_err(|e| {
            PkgSizeError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })
    }

    /// Ensure the config directory exists
    async fn ensure_config_dir(&self) -> PkgSizeResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| PkgSizeError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::InstallClient;
    use serial_test::serial;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_default_when_missing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nonexistent.toml");
        let manager = ConfigManager::with_path(path);

        let config = manager.load().await.unwrap();
        assert_eq!(config.bundler.command, "esbuild");
    }

    #[tokio::test]
    async fn save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let manager = ConfigManager::with_path(path);

        let mut config = Config::default();
        config.install.client = InstallClient::Npm;

        manager.save(&config).await.unwrap();
        let loaded = manager.load().await.unwrap();

        assert_eq!(loaded.install.client, InstallClient::Npm);
    }

    #[tokio::test]
    async fn invalid_file_is_reported() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[cache]\nenabled = \"maybe\"").unwrap();

        let err = ConfigManager::with_path(path).load().await.unwrap_err();
        assert!(matches!(err, PkgSizeError::ConfigInvalid { .. }));
    }

    #[test]
    #[serial]
    fn cache_dir_env_override() {
        let temp = TempDir::new().unwrap();
        std::env::set_var(CACHE_DIR_ENV, temp.path());

        let mut config = Config::default();
        config.cache.path = Some(PathBuf::from("/ignored/cache.json"));

        assert_eq!(ConfigManager::cache_dir(), temp.path());
        assert_eq!(
            ConfigManager::cache_file(&config),
            temp.path().join("cache.json")
        );

        std::env::remove_var(CACHE_DIR_ENV);
    }

    #[test]
    #[serial]
    fn cache_file_from_config() {
        std::env::remove_var(CACHE_DIR_ENV);

        let mut config = Config::default();
        assert!(ConfigManager::cache_file(&config).ends_with("package-size/cache.json"));

        config.cache.path = Some(PathBuf::from("/tmp/sizes.json"));
        assert_eq!(
            ConfigManager::cache_file(&config),
            PathBuf::from("/tmp/sizes.json")
        );
    }
}
