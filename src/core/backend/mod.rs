//! Search index backends.
//!
//! The catalog talks to its index only through [`SearchBackend`].
//!
//! - **LocalBackend**: embedded Tantivy collection
//! - **SolrBackend**: remote Solr core over HTTP+JSON

mod local;
mod solr;

pub use local::LocalBackend;
pub use solr::SolrBackend;

use crate::core::config::{BackendKind, Config};
use crate::core::error::Result;
use crate::core::registry::FieldRegistry;
use crate::core::storage::StorageManager;
use crate::core::types::{IndexQuery, IndexQueryResult, RawDocument};
use async_trait::async_trait;
use std::sync::Arc;

/// A search index able to answer catalog queries
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Short backend name for logs and server info
    fn name(&self) -> &'static str;

    async fn search(&self, query: &IndexQuery) -> Result<IndexQueryResult>;

    /// Fetch one record by id; `Ok(None)` when it does not exist
    async fn document(&self, id: &str) -> Result<Option<RawDocument>>;

    /// Completions for a lowercased prefix, best first
    async fn suggest(&self, prefix: &str, limit: usize) -> Result<Vec<String>>;
}

/// Build the backend selected by the configuration
pub fn from_config(
    config: &Config,
    registry: Arc<FieldRegistry>,
    storage: Arc<StorageManager>,
) -> Result<Arc<dyn SearchBackend>> {
    let backend: Arc<dyn SearchBackend> = match config.backend.kind {
        BackendKind::Local => Arc::new(LocalBackend::new(
            storage,
            config.storage.collection.clone(),
            registry,
        )),
        BackendKind::Solr => Arc::new(SolrBackend::new(
            &config.backend.solr_url,
            &config.autocomplete.path,
            registry,
        )?),
    };

    tracing::debug!(backend = backend.name(), "Search backend ready");
    Ok(backend)
}
