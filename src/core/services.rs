//! Unified service container for Vitrine
//!
//! Provides shared access to all core services.

use crate::core::backend;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::registry::{self, ActionRegistry, FieldRegistry};
use crate::core::search::CatalogService;
use crate::core::storage::StorageManager;
use std::sync::Arc;

/// Unified services container
///
/// All adapters use this same struct for service access.
#[derive(Clone)]
pub struct Services {
    /// Field definitions of the catalog
    pub registry: Arc<FieldRegistry>,

    /// Enabled UI actions
    pub actions: Arc<ActionRegistry>,

    /// Local collection management
    pub storage: Arc<StorageManager>,

    /// Search, record and facet queries
    pub catalog: Arc<CatalogService>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Create services from configuration
    ///
    /// The field registry is loaded once here and shared read-only.
    pub fn new(config: Config) -> Result<Self> {
        let registry = registry::load(&config.catalog)?;
        let actions = Arc::new(ActionRegistry::artifact_catalog());
        let storage = Arc::new(StorageManager::new(config.storage.index_dir.clone()));

        let backend = backend::from_config(&config, Arc::clone(&registry), Arc::clone(&storage))?;
        let catalog = Arc::new(CatalogService::new(
            &config,
            Arc::clone(&registry),
            Arc::clone(&actions),
            backend,
        ));

        Ok(Self {
            registry,
            actions,
            storage,
            catalog,
            config: Arc::new(config),
        })
    }
}
