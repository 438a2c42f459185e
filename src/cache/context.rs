//! Binding a cache store into a command invocation
//!
//! Each CLI invocation gets exactly one [`CacheStore`], built from the
//! resolved configuration: an explicit `cache.root` override wins, otherwise
//! the root derives from the configured tool name (falling back to the
//! binary's own name). Command handlers reach the store through the
//! [`CacheBinding`] accessor.

use crate::cache::store::{CacheStore, StoreOptions};
use crate::cache::RequestOptions;
use crate::config::Config;
use crate::error::KitbagResult;
use crate::ui::Reporter;

/// Per-invocation cache handle passed to command handlers
pub struct CacheBinding {
    store: CacheStore,
}

impl CacheBinding {
    /// Build the invocation's store from configuration.
    pub fn from_config(
        config: &Config,
        default_name: &str,
        reporter: &Reporter,
    ) -> KitbagResult<Self> {
        let name = config
            .cache
            .name
            .clone()
            .unwrap_or_else(|| default_name.to_string());

        let store = CacheStore::open(StoreOptions {
            name: Some(name),
            root: config.cache.root.clone(),
            request: RequestOptions {
                headers: config.cache.headers.clone(),
            },
            reporter: reporter.clone(),
        })?;

        Ok(Self { store })
    }

    /// The store bound to this invocation
    pub fn store(&self) -> &CacheStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.cache.root = Some(temp.path().to_path_buf());
        config.cache.name = Some("ignored".to_string());

        let binding = CacheBinding::from_config(&config, "kitbag", &Reporter::quiet()).unwrap();
        assert_eq!(binding.store().root(), temp.path());
    }

    #[test]
    fn name_derives_root() {
        let mut config = Config::default();
        config.cache.name = Some("mytool".to_string());

        let binding = CacheBinding::from_config(&config, "kitbag", &Reporter::quiet()).unwrap();
        assert!(binding.store().root().ends_with("mytool"));
    }

    #[test]
    fn falls_back_to_default_name() {
        let config = Config::default();
        let binding = CacheBinding::from_config(&config, "kitbag", &Reporter::quiet()).unwrap();
        assert!(binding.store().root().ends_with("kitbag"));
    }
}
