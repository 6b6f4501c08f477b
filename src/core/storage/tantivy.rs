//! Tantivy index for one catalog collection.
//!
//! The schema is derived from the field registry:
//!
//! - `text`: catch-all tokenized field receiving every value
//! - `<field>`: exact string per registered field (filters)
//! - `<field>__t`: tokenized copy of each searchable field
//! - `_source`: the whole record as stored JSON
//! - the id field, always present and exact

use crate::core::error::{Result, VitrineError};
use crate::core::registry::{FieldRegistry, FieldRole};
use crate::core::types::{value_strings, RawDocument};
use std::collections::HashSet;
use std::path::Path;
use tantivy::schema::{Field, Schema, STORED, STRING, TEXT};
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument};

/// Current schema version
/// Version 1: registry-derived fields with `_source` JSON
pub const SCHEMA_VERSION: u32 = 1;

pub const CATCH_ALL_FIELD: &str = "text";
pub const SOURCE_FIELD: &str = "_source";
const TOKENIZED_SUFFIX: &str = "__t";

const WRITER_HEAP_BYTES: usize = 50_000_000;

/// Schema field name for an index field name
///
/// Characters outside `[A-Za-z0-9_]` (e.g. `sherd_sample?_s`) become `_`.
pub fn exact_field_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

pub fn tokenized_field_name(name: &str) -> String {
    format!("{}{TOKENIZED_SUFFIX}", exact_field_name(name))
}

/// Create the Tantivy schema for a registry
pub fn create_schema(registry: &FieldRegistry) -> Schema {
    let mut builder = Schema::builder();
    let mut taken = HashSet::new();

    builder.add_text_field(CATCH_ALL_FIELD, TEXT);
    builder.add_text_field(SOURCE_FIELD, STORED);
    taken.insert(CATCH_ALL_FIELD.to_string());
    taken.insert(SOURCE_FIELD.to_string());

    let id = exact_field_name(registry.id_field());
    builder.add_text_field(&id, STRING | STORED);
    taken.insert(id);

    for field in registry.fields() {
        if field.name == CATCH_ALL_FIELD {
            continue;
        }

        let exact = exact_field_name(&field.name);
        if taken.insert(exact.clone()) {
            builder.add_text_field(&exact, STRING);
        } else if field.name != registry.id_field() {
            tracing::warn!(field = %field.name, "Field name collides in index schema; skipped");
            continue;
        }

        if field.has_role(FieldRole::Searchable) {
            let tokenized = tokenized_field_name(&field.name);
            if taken.insert(tokenized.clone()) {
                builder.add_text_field(&tokenized, TEXT);
            }
        }
    }

    builder.build()
}

/// Tantivy index wrapper
pub struct TantivyIndex {
    index: Index,
    schema: Schema,
    /// Created on first write
    writer: Option<IndexWriter>,
}

impl std::fmt::Debug for TantivyIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TantivyIndex")
            .field("schema", &"<schema>")
            .field("writable", &self.writer.is_some())
            .finish()
    }
}

impl TantivyIndex {
    /// Create a new index at the given path
    pub fn create(index_dir: &Path, registry: &FieldRegistry) -> Result<Self> {
        let schema = create_schema(registry);

        std::fs::create_dir_all(index_dir)?;

        let index = Index::create_in_dir(index_dir, schema.clone())
            .map_err(|e| VitrineError::StorageError(format!("Failed to create index: {e}")))?;

        Ok(Self {
            index,
            schema,
            writer: None,
        })
    }

    /// Open an existing index
    pub fn open(index_dir: &Path) -> Result<Self> {
        let index = Index::open_in_dir(index_dir)
            .map_err(|e| VitrineError::StorageError(format!("Failed to open index: {e}")))?;

        let schema = index.schema();

        Ok(Self {
            index,
            schema,
            writer: None,
        })
    }

    fn writer(&mut self) -> Result<&mut IndexWriter> {
        if self.writer.is_none() {
            let writer = self
                .index
                .writer(WRITER_HEAP_BYTES)
                .map_err(|e| VitrineError::StorageError(format!("Failed to create writer: {e}")))?;
            self.writer = Some(writer);
        }

        self.writer
            .as_mut()
            .ok_or_else(|| VitrineError::StorageError("Index writer unavailable".to_string()))
    }

    /// Look up a schema field
    pub fn field(&self, name: &str) -> Result<Field> {
        self.schema
            .get_field(name)
            .map_err(|e| VitrineError::StorageError(format!("Missing {name} field: {e}")))
    }

    /// Add records to the index (batch operation)
    ///
    /// Every value goes to the catch-all field; values of registered
    /// fields also go to their exact and tokenized fields.
    pub fn add_records(&mut self, records: &[RawDocument], registry: &FieldRegistry) -> Result<()> {
        let text_field = self.field(CATCH_ALL_FIELD)?;
        let source_field = self.field(SOURCE_FIELD)?;
        let id_name = registry.id_field();
        let id_field = self.field(&exact_field_name(id_name))?;

        let mut docs = Vec::with_capacity(records.len());
        for record in records {
            let id = record
                .get(id_name)
                .map(value_strings)
                .and_then(|v| v.into_iter().next())
                .ok_or_else(|| {
                    VitrineError::IngestFailed(format!("Record without '{id_name}' value"))
                })?;

            let mut doc = TantivyDocument::default();
            doc.add_text(id_field, &id);
            doc.add_text(source_field, serde_json::to_string(record)?);

            for (name, value) in record {
                let values = value_strings(value);
                for v in &values {
                    doc.add_text(text_field, v);
                }

                if name == id_name || name == CATCH_ALL_FIELD {
                    continue;
                }
                let Some(definition) = registry.get(name) else {
                    continue;
                };

                if let Ok(exact) = self.schema.get_field(&exact_field_name(name)) {
                    for v in &values {
                        doc.add_text(exact, v);
                    }
                }
                if definition.has_role(FieldRole::Searchable) {
                    if let Ok(tokenized) = self.schema.get_field(&tokenized_field_name(name)) {
                        for v in &values {
                            doc.add_text(tokenized, v);
                        }
                    }
                }
            }

            docs.push(doc);
        }

        let writer = self.writer()?;
        for doc in docs {
            writer
                .add_document(doc)
                .map_err(|e| VitrineError::StorageError(format!("Failed to add document: {e}")))?;
        }

        Ok(())
    }

    /// Commit changes to disk
    pub fn commit(&mut self) -> Result<()> {
        self.writer()?
            .commit()
            .map_err(|e| VitrineError::StorageError(format!("Failed to commit: {e}")))?;
        Ok(())
    }

    /// Get an index reader for searching
    pub fn reader(&self) -> Result<IndexReader> {
        self.index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| VitrineError::StorageError(format!("Failed to create reader: {e}")))
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Get a reference to the underlying Tantivy index
    pub fn index(&self) -> &Index {
        &self.index
    }
}
