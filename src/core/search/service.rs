//! Catalog service: request -> index query -> backend -> view.

use super::autocomplete::AutocompleteAdapter;
use super::builder::QueryBuilder;
use super::projector::ResponseProjector;
use super::retry::RetryPolicy;
use crate::core::backend::SearchBackend;
use crate::core::config::Config;
use crate::core::error::{Result, VitrineError};
use crate::core::registry::{ActionRegistry, FieldRegistry};
use crate::core::types::{DocumentView, FacetField, SearchRequest, SearchResponse};
use std::sync::Arc;
use std::time::Instant;

/// Search, record and facet pages of one catalog
pub struct CatalogService {
    builder: QueryBuilder,
    projector: ResponseProjector,
    backend: Arc<dyn SearchBackend>,
    retry: RetryPolicy,
    autocomplete: AutocompleteAdapter,
}

impl CatalogService {
    pub fn new(
        config: &Config,
        registry: Arc<FieldRegistry>,
        actions: Arc<ActionRegistry>,
        backend: Arc<dyn SearchBackend>,
    ) -> Self {
        let retry = RetryPolicy::from_config(&config.backend);
        Self {
            builder: QueryBuilder::new(Arc::clone(&registry), config.search.clone()),
            projector: ResponseProjector::new(registry, actions),
            autocomplete: AutocompleteAdapter::new(
                config.autocomplete.clone(),
                Arc::clone(&backend),
                retry,
            ),
            backend,
            retry,
        }
    }

    pub fn builder(&self) -> &QueryBuilder {
        &self.builder
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn autocomplete_enabled(&self) -> bool {
        self.autocomplete.is_enabled()
    }

    /// Run a catalog search
    ///
    /// The request is validated before the backend is contacted.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let start = Instant::now();
        let query = self.builder.build(request)?;

        let backend = &self.backend;
        let query_ref = &query;
        let raw = self
            .retry
            .run("search", move || backend.search(query_ref))
            .await?;

        let response = self.projector.project(&query, &raw)?;
        tracing::info!(
            q = query.effective_query(),
            filters = query.filters.len(),
            hits = response.total,
            page = response.page.page,
            duration_ms = start.elapsed().as_millis() as u64,
            "Search complete"
        );
        Ok(response)
    }

    /// Load the record page of `id`
    pub async fn document(&self, id: &str) -> Result<DocumentView> {
        let id = id.trim();
        if id.is_empty() {
            return Err(VitrineError::InvalidQuery(
                "Document id cannot be empty".to_string(),
            ));
        }

        let backend = &self.backend;
        let raw = self
            .retry
            .run("document", move || backend.document(id))
            .await?
            .ok_or_else(|| VitrineError::DocumentNotFound(id.to_string()))?;

        tracing::debug!(id, "Document loaded");
        self.projector.project_document(&raw)
    }

    /// Expanded value list of one facet under the request's constraints
    pub async fn facet(&self, request: &SearchRequest, field: &str) -> Result<FacetField> {
        let query = self.builder.build_facet(request, field)?;

        let backend = &self.backend;
        let query_ref = &query;
        let raw = self
            .retry
            .run("facet", move || backend.search(query_ref))
            .await?;

        let facet = self.projector.facet_field(&query, &raw, field);
        tracing::debug!(field, values = facet.values.len(), has_more = facet.has_more, "Facet expanded");
        Ok(facet)
    }

    pub async fn suggest(&self, partial: &str) -> Result<Vec<String>> {
        self.autocomplete.suggest(partial).await
    }
}
