//! Field definitions and the immutable field registry.
//!
//! A registry is assembled once through [`FieldRegistryBuilder`] and
//! then shared read-only. Registration order is the display order for
//! the index, show and facet views.

use crate::core::error::{Result, VitrineError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Baseline query weight for searchable fields without an explicit boost
pub const DEFAULT_QUERY_WEIGHT: f32 = 1.0;

/// Role a field plays in the search UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    Searchable,
    Facetable,
    Sortable,
    #[serde(alias = "index")]
    IndexDisplayed,
    #[serde(alias = "show")]
    ShowDisplayed,
}

impl FieldRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldRole::Searchable => "searchable",
            FieldRole::Facetable => "facetable",
            FieldRole::Sortable => "sortable",
            FieldRole::IndexDisplayed => "index",
            FieldRole::ShowDisplayed => "show",
        }
    }
}

/// A single index field and how the UI uses it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Index field name (e.g. `site_name_s`)
    pub name: String,
    pub label: String,
    pub roles: BTreeSet<FieldRole>,
    /// Relevance boost when searched; `None` means baseline weight
    pub query_weight: Option<f32>,
    /// Facet values are capped at the configured facet limit
    pub facet_limited: bool,
    /// Label shown in the sort menu
    pub sort_label: Option<String>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            roles: BTreeSet::new(),
            query_weight: None,
            facet_limited: false,
            sort_label: None,
        }
    }

    pub fn with_role(mut self, role: FieldRole) -> Self {
        self.roles.insert(role);
        self
    }

    pub fn searchable(self) -> Self {
        self.with_role(FieldRole::Searchable)
    }

    pub fn facetable(self) -> Self {
        self.with_role(FieldRole::Facetable)
    }

    /// Facetable with values capped at the facet limit
    pub fn limited_facet(mut self) -> Self {
        self.facet_limited = true;
        self.with_role(FieldRole::Facetable)
    }

    pub fn sortable(mut self, sort_label: impl Into<String>) -> Self {
        self.sort_label = Some(sort_label.into());
        self.with_role(FieldRole::Sortable)
    }

    pub fn index(self) -> Self {
        self.with_role(FieldRole::IndexDisplayed)
    }

    pub fn show(self) -> Self {
        self.with_role(FieldRole::ShowDisplayed)
    }

    pub fn weight(mut self, weight: f32) -> Self {
        self.query_weight = Some(weight);
        self
    }

    pub fn has_role(&self, role: FieldRole) -> bool {
        self.roles.contains(&role)
    }

    pub fn effective_weight(&self) -> f32 {
        self.query_weight.unwrap_or(DEFAULT_QUERY_WEIGHT)
    }

    /// Label for the sort menu, falling back to the display label
    pub fn sort_label(&self) -> &str {
        self.sort_label.as_deref().unwrap_or(&self.label)
    }
}

/// Ordered, immutable set of field definitions
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    fields: Vec<FieldDefinition>,
    positions: HashMap<String, usize>,
    sort_order: Vec<usize>,
    title_field: String,
    thumbnail_field: Option<String>,
    id_field: String,
    default_search_field: String,
}

impl FieldRegistry {
    pub fn builder() -> FieldRegistryBuilder {
        FieldRegistryBuilder::new()
    }

    /// All fields in registration order
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&FieldDefinition> {
        self.positions.get(name).map(|&i| &self.fields[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Display label, or the raw name for unregistered fields
    pub fn label_for<'a>(&'a self, name: &'a str) -> &'a str {
        self.get(name).map(|f| f.label.as_str()).unwrap_or(name)
    }

    /// Fields holding `role`, in registration order
    pub fn fields_with_role(&self, role: FieldRole) -> Vec<&FieldDefinition> {
        self.fields.iter().filter(|f| f.has_role(role)).collect()
    }

    pub fn has_role(&self, name: &str, role: FieldRole) -> bool {
        self.get(name).is_some_and(|f| f.has_role(role))
    }

    pub fn is_searchable(&self, name: &str) -> bool {
        self.has_role(name, FieldRole::Searchable)
    }

    pub fn is_facetable(&self, name: &str) -> bool {
        self.has_role(name, FieldRole::Facetable)
    }

    pub fn is_sortable(&self, name: &str) -> bool {
        self.has_role(name, FieldRole::Sortable)
    }

    /// Sort menu entries, in menu order
    pub fn sort_fields(&self) -> Vec<&FieldDefinition> {
        self.sort_order.iter().map(|&i| &self.fields[i]).collect()
    }

    /// First sort menu entry, used when browsing without a query
    pub fn default_sort(&self) -> Option<&FieldDefinition> {
        self.sort_order.first().map(|&i| &self.fields[i])
    }

    pub fn title_field(&self) -> &str {
        &self.title_field
    }

    pub fn thumbnail_field(&self) -> Option<&str> {
        self.thumbnail_field.as_deref()
    }

    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    pub fn default_search_field(&self) -> &str {
        &self.default_search_field
    }
}

/// Builder that accumulates field definitions before freezing them
#[derive(Debug, Clone)]
pub struct FieldRegistryBuilder {
    fields: Vec<FieldDefinition>,
    positions: HashMap<String, usize>,
    sort_order: Vec<String>,
    title_field: String,
    thumbnail_field: Option<String>,
    id_field: String,
    default_search_field: String,
}

impl Default for FieldRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldRegistryBuilder {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            positions: HashMap::new(),
            sort_order: Vec::new(),
            title_field: "mmap_artifact_id_s".to_string(),
            thumbnail_field: Some("THUMBNAIL_s".to_string()),
            id_field: "id".to_string(),
            default_search_field: "text".to_string(),
        }
    }

    /// Append a field definition
    ///
    /// # Errors
    ///
    /// `DuplicateField` if a field with the same name is already registered,
    /// `ConfigError` for an empty name or a non-positive weight.
    pub fn register(&mut self, field: FieldDefinition) -> Result<&mut Self> {
        if field.name.trim().is_empty() {
            return Err(VitrineError::ConfigError(
                "Field name must be non-empty".to_string(),
            ));
        }

        if let Some(weight) = field.query_weight {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(VitrineError::ConfigError(format!(
                    "Field '{}' has invalid query weight {weight}",
                    field.name
                )));
            }
        }

        if self.positions.contains_key(&field.name) {
            return Err(VitrineError::DuplicateField(field.name));
        }

        self.positions.insert(field.name.clone(), self.fields.len());
        self.fields.push(field);
        Ok(self)
    }

    /// Chaining form of [`register`](Self::register)
    pub fn field(mut self, field: FieldDefinition) -> Result<Self> {
        self.register(field)?;
        Ok(self)
    }

    /// Sort menu order; sortable fields left out follow in registration order
    pub fn sort_order<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort_order = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn title_field(mut self, name: impl Into<String>) -> Self {
        self.title_field = name.into();
        self
    }

    pub fn thumbnail_field(mut self, name: Option<String>) -> Self {
        self.thumbnail_field = name;
        self
    }

    pub fn id_field(mut self, name: impl Into<String>) -> Self {
        self.id_field = name.into();
        self
    }

    pub fn default_search_field(mut self, name: impl Into<String>) -> Self {
        self.default_search_field = name.into();
        self
    }

    /// Freeze the registry
    pub fn build(self) -> Result<FieldRegistry> {
        if !self.positions.contains_key(&self.title_field) {
            return Err(VitrineError::ConfigError(format!(
                "Title field '{}' is not registered",
                self.title_field
            )));
        }

        let default_searchable = self
            .positions
            .get(&self.default_search_field)
            .is_some_and(|&i| self.fields[i].has_role(FieldRole::Searchable));
        if !default_searchable {
            return Err(VitrineError::ConfigError(format!(
                "Default search field '{}' is not a registered searchable field",
                self.default_search_field
            )));
        }

        if self.id_field.trim().is_empty() {
            return Err(VitrineError::ConfigError(
                "Id field must be non-empty".to_string(),
            ));
        }

        let mut sort_order = Vec::new();
        for name in &self.sort_order {
            match self.positions.get(name) {
                Some(&i) if self.fields[i].has_role(FieldRole::Sortable) => {
                    if !sort_order.contains(&i) {
                        sort_order.push(i);
                    }
                }
                _ => {
                    return Err(VitrineError::ConfigError(format!(
                        "Sort field '{name}' is not a registered sortable field"
                    )));
                }
            }
        }
        for (i, field) in self.fields.iter().enumerate() {
            if field.has_role(FieldRole::Sortable) && !sort_order.contains(&i) {
                sort_order.push(i);
            }
        }

        Ok(FieldRegistry {
            fields: self.fields,
            positions: self.positions,
            sort_order,
            title_field: self.title_field,
            thumbnail_field: self.thumbnail_field,
            id_field: self.id_field,
            default_search_field: self.default_search_field,
        })
    }
}
