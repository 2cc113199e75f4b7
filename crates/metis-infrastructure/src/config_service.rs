//! Configuration service.
//!
//! Loads the root configuration from `config.toml` and caches it.

use crate::paths::MetisPaths;
use crate::storage::AtomicTomlFile;
use metis_core::Result;
use metis_core::config::RootConfig;
use std::sync::{Arc, RwLock};

/// Loads and caches [`RootConfig`].
///
/// A missing file is created with the defaults so users have something to
/// edit. A malformed file is reported once and the defaults are used.
#[derive(Debug, Clone)]
pub struct ConfigService {
    paths: MetisPaths,
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    pub fn new(paths: MetisPaths) -> Self {
        Self {
            paths,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the root configuration, loading from file if not cached.
    pub fn get_config(&self) -> RootConfig {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return cached.clone();
            }
        }

        let loaded = self.load_config().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to load config, using defaults");
            RootConfig::default()
        });

        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = Some(loaded.clone());
        loaded
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }

    fn load_config(&self) -> Result<RootConfig> {
        let file = AtomicTomlFile::<RootConfig>::new(self.paths.config_file());
        match file.load()? {
            Some(config) => Ok(config),
            None => {
                let config = RootConfig::default();
                file.save(&config)?;
                tracing::info!(path = ?file.path(), "wrote default config");
                Ok(config)
            }
        }
    }
}
