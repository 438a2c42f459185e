//! Configuration management
//!
//! Configuration is resolved in layers with a fixed precedence, lowest
//! first:
//!
//! 1. built-in defaults ([`Config::default`])
//! 2. the config file (`--config` path, or `~/.config/kitbag/config.toml`)
//! 3. environment (`KITBAG_CACHE_ROOT`, `KITBAG_CACHE_NAME`)
//! 4. command-line flags (`--cache-root`, `--name`)
//!
//! Later layers override individual fields; there is no implicit merging
//! beyond that.

pub mod schema;

pub use schema::Config;

use crate::error::{KitbagError, KitbagResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Environment variable for layer 3 cache-root override
pub const ENV_CACHE_ROOT: &str = "KITBAG_CACHE_ROOT";
/// Environment variable for layer 3 tool-name override
pub const ENV_CACHE_NAME: &str = "KITBAG_CACHE_NAME";

/// Field overrides from command-line flags (layer 4)
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub cache_root: Option<PathBuf>,
    pub name: Option<String>,
}

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
            .join("kitbag")
            .join("config.toml")
    }

    /// Load configuration, using defaults if the file does not exist
    pub async fn load(&self) -> KitbagResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> KitbagResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| KitbagError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| KitbagError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load configuration with environment and flag layers applied, in
    /// the module-level precedence order.
    pub async fn load_resolved(&self, overrides: &Overrides) -> KitbagResult<Config> {
        let mut config = self.load().await?;
        apply_env(&mut config, |key| std::env::var(key).ok());
        apply_overrides(&mut config, overrides);
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> KitbagResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            KitbagError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    async fn ensure_config_dir(&self) -> KitbagResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| KitbagError::ConfigDirCreate {
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

/// Apply the environment layer. Takes the lookup as a closure so tests do
/// not have to mutate the process environment.
fn apply_env(config: &mut Config, get: impl Fn(&str) -> Option<String>) {
    if let Some(root) = get(ENV_CACHE_ROOT) {
        config.cache.root = Some(PathBuf::from(root));
    }
    if let Some(name) = get(ENV_CACHE_NAME) {
        config.cache.name = Some(name);
    }
}

/// Apply the command-line flag layer
fn apply_overrides(config: &mut Config, overrides: &Overrides) {
    if let Some(root) = &overrides.cache_root {
        config.cache.root = Some(root.clone());
    }
    if let Some(name) = &overrides.name {
        config.cache.name = Some(name.clone());
    }
}
