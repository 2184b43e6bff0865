//! Router configuration.
//!
//! Each manager cache has its own [`CacheConfig`]. The defaults are the same
//! for all three (capacity 50, one hour idle TTL) but nothing couples them.
//!
//! [`ConfigLoader`] layers configuration with figment, lowest precedence first:
//! 1. Programmatic defaults (Serialized)
//! 2. An optional YAML file
//! 3. Environment variables (`SCOPECACHE_` prefix, `__` as the nesting separator)

use crate::error::ConfigError;
use crate::factory::ManagerKind;
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use scopecache_core::CacheConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Capacity and TTL for each of the three manager caches.
///
/// ```yaml
/// collection:
///   capacity: 50
///   ttl_ms: 3600000
/// index:
///   capacity: 200
/// graph:
///   ttl_ms: 600000
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub collection: CacheConfig,
    pub index: CacheConfig,
    pub graph: CacheConfig,
}

impl RouterConfig {
    /// Uses the same settings for all three caches.
    pub fn uniform(config: CacheConfig) -> Self {
        Self {
            collection: config,
            index: config,
            graph: config,
        }
    }

    pub fn for_kind(&self, kind: ManagerKind) -> CacheConfig {
        match kind {
            ManagerKind::Collection => self.collection,
            ManagerKind::Index => self.index,
            ManagerKind::Graph => self.graph,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in ManagerKind::ALL {
            self.for_kind(kind)
                .validate()
                .map_err(|source| ConfigError::InvalidCache {
                    cache: kind,
                    source,
                })?;
        }
        Ok(())
    }
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    pub const ENV_PREFIX: &'static str = "SCOPECACHE_";

    /// Load defaults overridden by `SCOPECACHE_*` environment variables.
    pub fn load() -> Result<RouterConfig, ConfigError> {
        Self::extract(
            Figment::new()
                .merge(Serialized::defaults(RouterConfig::default()))
                .merge(Env::prefixed(Self::ENV_PREFIX).split("__")),
        )
    }

    /// Load defaults, then the YAML file at `path`, then the environment.
    ///
    /// A missing file is not an error; it simply contributes nothing.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<RouterConfig, ConfigError> {
        Self::extract(
            Figment::new()
                .merge(Serialized::defaults(RouterConfig::default()))
                .merge(Yaml::file(path.as_ref()))
                .merge(Env::prefixed(Self::ENV_PREFIX).split("__")),
        )
    }

    fn extract(figment: Figment) -> Result<RouterConfig, ConfigError> {
        let config: RouterConfig = figment.extract()?;
        config.validate()?;
        Ok(config)
    }
}
