//! Query builder: user request + field registry -> index query.
//!
//! All validation happens here, before anything is sent to the index.

use super::query::normalize_query;
use crate::core::config::SearchConfig;
use crate::core::error::{Result, VitrineError};
use crate::core::registry::{FieldRegistry, FieldRole};
use crate::core::types::{
    FacetRequest, FilterClause, IndexQuery, SearchRequest, SortClause, SortDirection, SortRequest,
    WeightedField,
};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// Builds normalized index queries against one registry
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    registry: Arc<FieldRegistry>,
    defaults: SearchConfig,
}

impl QueryBuilder {
    pub fn new(registry: Arc<FieldRegistry>, defaults: SearchConfig) -> Self {
        Self { registry, defaults }
    }

    pub fn registry(&self) -> &Arc<FieldRegistry> {
        &self.registry
    }

    pub fn defaults(&self) -> &SearchConfig {
        &self.defaults
    }

    /// Build the index query for a request
    ///
    /// # Errors
    ///
    /// - `UnknownSearchField` if the search field is not searchable
    /// - `UnknownFacetField` if a filter or the expanded facet is not facetable
    /// - `InvalidPageSize` if `per_page` is outside the allowed sizes
    /// - `InvalidSortField` if the sort field is not sortable
    /// - `InvalidQuery` for page 0 or over-long query text
    pub fn build(&self, request: &SearchRequest) -> Result<IndexQuery> {
        let q = normalize_query(&request.query, self.defaults.max_query_length)?;
        let weighted = self.search_field(request.search_field.as_deref())?;
        let filters = self.filters(&request.filters)?;
        let facets = self.facets(request.expand_facet.as_deref())?;
        let rows = self.rows(request.per_page)?;
        let start = self.start(request.page, rows)?;
        let sort = self.sort(request.sort.as_ref(), q.is_none())?;

        let spellcheck_count = (self.defaults.spellcheck && q.is_some())
            .then_some(self.defaults.spell_max);

        Ok(IndexQuery {
            q,
            q_alt: self.defaults.match_all_query.clone(),
            search_field: weighted.field.clone(),
            query_fields: vec![weighted.clone()],
            phrase_fields: vec![weighted],
            operator: request.operator.unwrap_or(self.defaults.default_operator),
            filters,
            facets,
            facet_mincount: self.defaults.facet_mincount,
            start,
            rows,
            sort,
            spellcheck_count,
        })
    }

    /// Query for the expanded value list of a single facet
    ///
    /// Same constraints as the full search, but no documents are fetched
    /// and only `field` is faceted, with the expanded limit.
    pub fn build_facet(&self, request: &SearchRequest, field: &str) -> Result<IndexQuery> {
        if !self.registry.is_facetable(field) {
            return Err(VitrineError::UnknownFacetField(field.to_string()));
        }

        let mut expanded = request.clone();
        expanded.expand_facet = Some(field.to_string());

        let mut query = self.build(&expanded)?;
        query.facets.retain(|f| f.field == field);
        query.rows = 0;
        query.start = 0;
        query.spellcheck_count = None;
        Ok(query)
    }

    fn search_field(&self, requested: Option<&str>) -> Result<WeightedField> {
        let name = requested
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.registry.default_search_field());

        let field = self
            .registry
            .get(name)
            .filter(|f| f.has_role(FieldRole::Searchable))
            .ok_or_else(|| VitrineError::UnknownSearchField(name.to_string()))?;

        Ok(WeightedField {
            field: field.name.clone(),
            weight: field.effective_weight(),
        })
    }

    fn filters(&self, requested: &BTreeMap<String, Vec<String>>) -> Result<Vec<FilterClause>> {
        if let Some(unknown) = requested.keys().find(|f| !self.registry.is_facetable(f)) {
            return Err(VitrineError::UnknownFacetField(unknown.clone()));
        }

        // Registry order keeps the clause list stable across requests
        let mut clauses = Vec::new();
        for field in self.registry.fields_with_role(FieldRole::Facetable) {
            let Some(values) = requested.get(&field.name) else {
                continue;
            };

            let mut seen = HashSet::new();
            let values: Vec<String> = values
                .iter()
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .filter(|v| seen.insert(*v))
                .map(str::to_string)
                .collect();

            if !values.is_empty() {
                clauses.push(FilterClause {
                    field: field.name.clone(),
                    values,
                });
            }
        }

        Ok(clauses)
    }

    fn facets(&self, expand: Option<&str>) -> Result<Vec<FacetRequest>> {
        if let Some(name) = expand {
            if !self.registry.is_facetable(name) {
                return Err(VitrineError::UnknownFacetField(name.to_string()));
            }
        }

        // One extra value tells the projector whether more exist
        let facets = self
            .registry
            .fields_with_role(FieldRole::Facetable)
            .into_iter()
            .map(|field| {
                let limit = if expand == Some(field.name.as_str()) {
                    Some(self.defaults.expanded_facet_limit + 1)
                } else if field.facet_limited {
                    Some(self.defaults.default_facet_limit + 1)
                } else {
                    None
                };
                FacetRequest {
                    field: field.name.clone(),
                    limit,
                }
            })
            .collect();

        Ok(facets)
    }

    fn rows(&self, per_page: Option<usize>) -> Result<usize> {
        match per_page {
            None => Ok(self.defaults.default_per_page),
            Some(n) if self.defaults.per_page_options.contains(&n) => Ok(n),
            Some(n) => Err(VitrineError::InvalidPageSize {
                requested: n,
                allowed: self.defaults.per_page_options.clone(),
            }),
        }
    }

    fn start(&self, page: usize, rows: usize) -> Result<usize> {
        if page == 0 {
            return Err(VitrineError::InvalidQuery(
                "Page numbers start at 1".to_string(),
            ));
        }

        (page - 1)
            .checked_mul(rows)
            .ok_or_else(|| VitrineError::InvalidQuery(format!("Page {page} is out of range")))
    }

    /// Browsing without query text falls back to the first sort menu entry
    fn sort(&self, requested: Option<&SortRequest>, browsing: bool) -> Result<SortClause> {
        let Some(sort) = requested else {
            return Ok(match self.registry.default_sort() {
                Some(field) if browsing => SortClause::Field {
                    field: field.name.clone(),
                    direction: SortDirection::Asc,
                },
                _ => SortClause::Relevance,
            });
        };

        if !self.registry.is_sortable(&sort.field) {
            return Err(VitrineError::InvalidSortField(sort.field.clone()));
        }

        Ok(SortClause::Field {
            field: sort.field.clone(),
            direction: sort.direction,
        })
    }
}
