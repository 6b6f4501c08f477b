//! Core data types for Vitrine.
//!
//! Requests coming from a consumer, the normalized query sent to the
//! search index, the raw index result, and the view-ready responses
//! produced by the projector.

use crate::core::error::{Result, VitrineError};
use crate::core::registry::ActionKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A single record as returned by the index (field name -> JSON value)
pub type RawDocument = serde_json::Map<String, serde_json::Value>;

/// How query tokens combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    #[default]
    And,
    Or,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
        }
    }
}

impl FromStr for Operator {
    type Err = VitrineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(Operator::And),
            "OR" => Ok(Operator::Or),
            other => Err(VitrineError::InvalidQuery(format!(
                "Unknown operator '{other}' (expected AND or OR)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Sort requested by a consumer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortRequest {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortRequest {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Parse `"field"`, `"field asc"` or `"field desc"`.
    ///
    /// `"relevance"` and `"score"` (optionally followed by `desc`) mean
    /// relevance ordering and yield `None`.
    pub fn parse(s: &str) -> Result<Option<Self>> {
        let mut parts = s.split_whitespace();
        let Some(field) = parts.next() else {
            return Ok(None);
        };

        let direction = match parts.next().map(|d| d.to_ascii_lowercase()) {
            None => SortDirection::Asc,
            Some(d) if d == "asc" => SortDirection::Asc,
            Some(d) if d == "desc" => SortDirection::Desc,
            Some(d) => {
                return Err(VitrineError::InvalidQuery(format!(
                    "Unknown sort direction '{d}'"
                )))
            }
        };

        if parts.next().is_some() {
            return Err(VitrineError::InvalidQuery(format!(
                "Sort must be '<field> [asc|desc]', got '{s}'"
            )));
        }

        if matches!(field, "relevance" | "score") {
            return Ok(None);
        }

        Ok(Some(Self {
            field: field.to_string(),
            direction,
        }))
    }
}

/// Request from a consumer (CLI, UI)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Raw query text; empty means browse everything
    #[serde(default)]
    pub query: String,

    /// Field to search in; `None` uses the registry's default search field
    #[serde(default)]
    pub search_field: Option<String>,

    /// Selected facet values per facet field
    #[serde(default)]
    pub filters: BTreeMap<String, Vec<String>>,

    /// 1-based page number
    #[serde(default = "default_page")]
    pub page: usize,

    #[serde(default)]
    pub per_page: Option<usize>,

    #[serde(default)]
    pub sort: Option<SortRequest>,

    #[serde(default)]
    pub operator: Option<Operator>,

    /// Facet whose values should be fetched beyond the display limit
    #[serde(default)]
    pub expand_facet: Option<String>,
}

fn default_page() -> usize {
    1
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            search_field: None,
            filters: BTreeMap::new(),
            page: default_page(),
            per_page: None,
            sort: None,
            operator: None,
            expand_facet: None,
        }
    }
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters
            .entry(field.into())
            .or_default()
            .push(value.into());
        self
    }

    pub fn with_search_field(mut self, field: impl Into<String>) -> Self {
        self.search_field = Some(field.into());
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn with_sort(mut self, sort: SortRequest) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = Some(operator);
        self
    }

    pub fn expand(mut self, facet: impl Into<String>) -> Self {
        self.expand_facet = Some(facet.into());
        self
    }
}

/// Field with its query weight (`qf`/`pf` entry)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedField {
    pub field: String,
    pub weight: f32,
}

/// Filter on one facet field; values are alternatives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterClause {
    pub field: String,
    pub values: Vec<String>,
}

/// Facet counts requested for one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetRequest {
    pub field: String,
    /// Maximum values to return; `None` returns all
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "lowercase")]
pub enum SortClause {
    #[default]
    Relevance,
    Field {
        field: String,
        direction: SortDirection,
    },
}

impl fmt::Display for SortClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortClause::Relevance => write!(f, "score desc"),
            SortClause::Field { field, direction } => {
                write!(f, "{field} {}", direction.as_str())
            }
        }
    }
}

/// Normalized request sent to the search index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexQuery {
    /// User query text; `None` means the match-all fallback applies
    pub q: Option<String>,
    pub q_alt: String,
    pub search_field: String,
    pub query_fields: Vec<WeightedField>,
    pub phrase_fields: Vec<WeightedField>,
    pub operator: Operator,
    /// Conjunctive across clauses, disjunctive within a clause
    pub filters: Vec<FilterClause>,
    pub facets: Vec<FacetRequest>,
    pub facet_mincount: u64,
    pub start: usize,
    pub rows: usize,
    pub sort: SortClause,
    pub spellcheck_count: Option<usize>,
}

impl IndexQuery {
    /// Query text actually evaluated by the index
    pub fn effective_query(&self) -> &str {
        self.q.as_deref().unwrap_or(&self.q_alt)
    }

    pub fn is_match_all(&self) -> bool {
        self.q.is_none()
    }

    pub fn facet_limit(&self, field: &str) -> Option<usize> {
        self.facets
            .iter()
            .find(|f| f.field == field)
            .and_then(|f| f.limit)
    }

    pub fn selected_values(&self, field: &str) -> &[String] {
        self.filters
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.values.as_slice())
            .unwrap_or(&[])
    }

    /// 1-based page number derived from start and rows
    pub fn page(&self) -> usize {
        if self.rows == 0 {
            1
        } else {
            self.start / self.rows + 1
        }
    }
}

/// Raw result returned by a search backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexQueryResult {
    pub docs: Vec<RawDocument>,
    pub num_found: u64,
    /// Facet field -> (value, count) pairs in index order
    pub facet_counts: BTreeMap<String, Vec<(String, u64)>>,
    pub spelling: Vec<String>,
}

/// Labelled field value in a projected view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    pub name: String,
    pub label: String,
    pub values: Vec<String>,
}

/// Result list entry (index view)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDocument {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub fields: Vec<FieldValue>,
}

impl IndexDocument {
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetValue {
    pub value: String,
    pub count: u64,
    pub selected: bool,
}

/// Counts for one facet field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetField {
    pub name: String,
    pub label: String,
    pub values: Vec<FacetValue>,
    /// Display limit applied, if any
    pub limit: Option<usize>,
    /// More values exist beyond the limit
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub page: usize,
    pub per_page: usize,
    pub offset: usize,
    pub total_pages: u64,
}

/// View-ready search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub documents: Vec<IndexDocument>,
    pub facets: Vec<FacetField>,
    pub total: u64,
    pub page: PageInfo,
    pub sort: SortClause,
    pub spelling: Vec<String>,
    pub tools: Vec<ActionKind>,
}

impl SearchResponse {
    pub fn facet(&self, name: &str) -> Option<&FacetField> {
        self.facets.iter().find(|f| f.name == name)
    }
}

/// Single document (show view)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentView {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub fields: Vec<FieldValue>,
    pub actions: Vec<ActionKind>,
}

impl DocumentView {
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Display strings of a stored value; blanks and nulls are dropped
pub fn value_strings(value: &serde_json::Value) -> Vec<String> {
    use serde_json::Value;

    fn scalar(value: &Value) -> Option<String> {
        let s = match value {
            Value::Null => return None,
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => other.to_string(),
        };
        (!s.is_empty()).then_some(s)
    }

    match value {
        Value::Array(items) => items.iter().filter_map(scalar).collect(),
        other => scalar(other).into_iter().collect(),
    }
}

/// Statistics from an ingest run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestStats {
    pub documents_indexed: usize,
    pub rows_skipped: usize,
    pub duration_ms: u64,
    pub collection: String,
}
