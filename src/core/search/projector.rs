//! Response projector: raw index result -> view-ready response.
//!
//! Projection is a pure function of the query, the raw result and the
//! registry, so projecting the same inputs twice yields equal output.

use crate::core::error::{Result, VitrineError};
use crate::core::registry::{ActionRegistry, ActionScope, FieldRegistry, FieldRole};
use crate::core::types::{
    DocumentView, FacetField, FacetValue, FieldValue, IndexDocument, IndexQuery,
    IndexQueryResult, PageInfo, RawDocument, SearchResponse, value_strings,
};
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ResponseProjector {
    registry: Arc<FieldRegistry>,
    actions: Arc<ActionRegistry>,
}

impl ResponseProjector {
    pub fn new(registry: Arc<FieldRegistry>, actions: Arc<ActionRegistry>) -> Self {
        Self { registry, actions }
    }

    /// Project a search result into index and facet views
    pub fn project(&self, query: &IndexQuery, raw: &IndexQueryResult) -> Result<SearchResponse> {
        let documents = raw
            .docs
            .iter()
            .map(|doc| self.index_document(doc))
            .collect::<Result<Vec<_>>>()?;

        let facets = query
            .facets
            .iter()
            .filter(|f| self.registry.is_facetable(&f.field))
            .map(|f| self.facet_field(query, raw, &f.field))
            .collect();

        let total_pages = if query.rows == 0 {
            0
        } else {
            raw.num_found.div_ceil(query.rows as u64)
        };

        let spelling = dedup(raw.spelling.iter().map(String::as_str))
            .into_iter()
            .take(query.spellcheck_count.unwrap_or(0))
            .collect();

        Ok(SearchResponse {
            query: query.q.clone().unwrap_or_default(),
            documents,
            facets,
            total: raw.num_found,
            page: PageInfo {
                page: query.page(),
                per_page: query.rows,
                offset: query.start,
                total_pages,
            },
            sort: query.sort.clone(),
            spelling,
            tools: self.actions.actions(ActionScope::ResultsCollection),
        })
    }

    /// Project one facet's counts
    pub fn facet_field(&self, query: &IndexQuery, raw: &IndexQueryResult, field: &str) -> FacetField {
        let selected = query.selected_values(field);
        let mut values: Vec<FacetValue> = raw
            .facet_counts
            .get(field)
            .map(|counts| {
                counts
                    .iter()
                    .filter(|(value, count)| *count >= query.facet_mincount && !value.is_empty())
                    .map(|(value, count)| FacetValue {
                        value: value.clone(),
                        count: *count,
                        selected: selected.contains(value),
                    })
                    .collect()
            })
            .unwrap_or_default();

        values.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));

        // The query asks for one value beyond what is displayed
        let limit = query.facet_limit(field).map(|l| l.saturating_sub(1));
        let has_more = limit.is_some_and(|l| values.len() > l);
        if let Some(l) = limit {
            values.truncate(l);
        }

        FacetField {
            name: field.to_string(),
            label: self.registry.label_for(field).to_string(),
            values,
            limit,
            has_more,
        }
    }

    /// Project a single record into the show view
    pub fn project_document(&self, raw: &RawDocument) -> Result<DocumentView> {
        Ok(DocumentView {
            id: self.document_id(raw)?,
            title: self.title(raw),
            thumbnail: self.thumbnail(raw),
            fields: self.labelled_fields(raw, FieldRole::ShowDisplayed),
            actions: self.actions.actions(ActionScope::ShowTools),
        })
    }

    fn index_document(&self, raw: &RawDocument) -> Result<IndexDocument> {
        Ok(IndexDocument {
            id: self.document_id(raw)?,
            title: self.title(raw),
            thumbnail: self.thumbnail(raw),
            fields: self.labelled_fields(raw, FieldRole::IndexDisplayed),
        })
    }

    fn document_id(&self, raw: &RawDocument) -> Result<String> {
        let id_field = self.registry.id_field();
        raw.get(id_field)
            .map(value_strings)
            .and_then(|values| values.into_iter().next())
            .ok_or_else(|| {
                VitrineError::MalformedResponse(format!("Document without '{id_field}' value"))
            })
    }

    fn title(&self, raw: &RawDocument) -> String {
        first_value(raw, self.registry.title_field()).unwrap_or_default()
    }

    fn thumbnail(&self, raw: &RawDocument) -> Option<String> {
        self.registry
            .thumbnail_field()
            .and_then(|field| first_value(raw, field))
    }

    fn labelled_fields(&self, raw: &RawDocument, role: FieldRole) -> Vec<FieldValue> {
        self.registry
            .fields_with_role(role)
            .into_iter()
            .filter_map(|field| {
                let values = raw.get(&field.name).map(value_strings)?;
                (!values.is_empty()).then(|| FieldValue {
                    name: field.name.clone(),
                    label: field.label.clone(),
                    values,
                })
            })
            .collect()
    }
}

fn first_value(raw: &RawDocument, field: &str) -> Option<String> {
    raw.get(field)
        .map(value_strings)
        .and_then(|values| values.into_iter().next())
}

fn dedup<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .filter(|s| seen.insert(*s))
        .map(str::to_string)
        .collect()
}
