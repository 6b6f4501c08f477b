//! Field registry loaded from a TOML file.
//!
//! ```toml
//! title_field = "mmap_artifact_id_s"
//! default_search_field = "text"
//! sort_order = ["site_name_s"]
//!
//! [[fields]]
//! name = "text"
//! label = "Any field"
//! roles = ["searchable"]
//!
//! [[fields]]
//! name = "site_name_s"
//! label = "Site Name"
//! roles = ["searchable", "facetable", "index", "show"]
//! limit = true
//! sort_label = "Site"
//! ```

use super::field::{FieldDefinition, FieldRegistry, FieldRole};
use crate::core::error::{Result, VitrineError};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RegistryFile {
    title_field: Option<String>,
    thumbnail_field: Option<String>,
    id_field: Option<String>,
    default_search_field: Option<String>,
    #[serde(default)]
    sort_order: Vec<String>,
    #[serde(default)]
    fields: Vec<FieldEntry>,
}

#[derive(Debug, Deserialize)]
struct FieldEntry {
    name: String,
    label: Option<String>,
    #[serde(default)]
    roles: Vec<FieldRole>,
    weight: Option<f32>,
    #[serde(default)]
    limit: bool,
    sort_label: Option<String>,
}

impl FieldEntry {
    fn into_definition(self) -> FieldDefinition {
        let label = self.label.unwrap_or_else(|| self.name.clone());
        let mut field = FieldDefinition::new(self.name, label);
        for role in self.roles {
            field = field.with_role(role);
        }
        field.query_weight = self.weight;
        field.facet_limited = self.limit;
        if let Some(sort_label) = self.sort_label {
            field = field.sortable(sort_label);
        }
        field
    }
}

/// Parse a registry from TOML text
pub fn parse_registry(contents: &str) -> Result<FieldRegistry> {
    let file: RegistryFile = toml::from_str(contents)?;

    if file.fields.is_empty() {
        return Err(VitrineError::ConfigError(
            "Fields file declares no fields".to_string(),
        ));
    }

    let mut builder = FieldRegistry::builder();
    if let Some(title) = file.title_field {
        builder = builder.title_field(title);
    }
    if file.thumbnail_field.is_some() {
        builder = builder.thumbnail_field(file.thumbnail_field);
    }
    if let Some(id) = file.id_field {
        builder = builder.id_field(id);
    }
    if let Some(default_search) = file.default_search_field {
        builder = builder.default_search_field(default_search);
    }
    if !file.sort_order.is_empty() {
        builder = builder.sort_order(file.sort_order);
    }

    for entry in file.fields {
        builder.register(entry.into_definition())?;
    }

    builder.build()
}

/// Load a registry from a TOML file on disk
pub fn load_registry(path: &Path) -> Result<FieldRegistry> {
    let contents = fs::read_to_string(path).map_err(|e| {
        VitrineError::ConfigError(format!("Failed to read fields file {path:?}: {e}"))
    })?;

    let registry = parse_registry(&contents)?;
    tracing::info!(path = ?path, fields = registry.len(), "Loaded field registry");
    Ok(registry)
}
