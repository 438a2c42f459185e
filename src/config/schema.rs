//! Configuration schema
//!
//! Configuration is stored at `~/.config/kitbag/config.toml`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Cache settings
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

/// Cache settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Explicit cache root; overrides the per-tool derived location
    pub root: Option<PathBuf>,

    /// Tool name the default root is derived from
    pub name: Option<String>,

    /// Headers sent with every fetch (auth tokens, mirrors behind proxies)
    pub headers: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.general.log_format, "text");
        assert!(config.cache.root.is_none());
        assert!(config.cache.headers.is_empty());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [cache]
            name = "mytool"
            "#,
        )
        .unwrap();

        assert_eq!(config.cache.name.as_deref(), Some("mytool"));
        assert!(config.cache.root.is_none());
        assert_eq!(config.general.log_format, "text");
    }

    #[test]
    fn headers_roundtrip() {
        let mut config = Config::default();
        config
            .cache
            .headers
            .insert("authorization".into(), "Bearer tok".into());

        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.cache.headers["authorization"], "Bearer tok");
    }
}
