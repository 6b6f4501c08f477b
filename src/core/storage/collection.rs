//! Collection-based storage management.
//!
//! This module manages named local collections, including
//! creation, deletion, ingestion and metadata tracking.

use crate::core::error::{Result, VitrineError};
use crate::core::ingest::IngestPipeline;
use crate::core::registry::FieldRegistry;
use crate::core::storage::tantivy::{TantivyIndex, SCHEMA_VERSION};
use crate::core::types::IngestStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Collection metadata (schema v1)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionMetadata {
    pub id: String,
    pub source_path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub last_ingested_at: DateTime<Utc>,
    pub documents_ingested: usize,
    pub index_size_bytes: u64,
    pub schema_version: u32,
}

impl CollectionMetadata {
    fn new(collection_id: &str, source_path: PathBuf) -> Self {
        let now = Utc::now();
        Self {
            id: collection_id.to_string(),
            source_path,
            created_at: now,
            last_ingested_at: now,
            documents_ingested: 0,
            index_size_bytes: 0,
            schema_version: SCHEMA_VERSION,
        }
    }
}

/// Collection storage manager
#[derive(Debug)]
pub struct StorageManager {
    /// Root directory holding `collections/`
    storage_root: PathBuf,
}

impl StorageManager {
    pub fn new(storage_root: PathBuf) -> Self {
        Self { storage_root }
    }

    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }

    fn collections_dir(&self) -> PathBuf {
        self.storage_root.join("collections")
    }

    fn collection_dir(&self, collection_id: &str) -> PathBuf {
        self.collections_dir().join(collection_id)
    }

    fn tantivy_dir(&self, collection_id: &str) -> PathBuf {
        self.collection_dir(collection_id).join("tantivy")
    }

    fn metadata_path(&self, collection_id: &str) -> PathBuf {
        self.collection_dir(collection_id).join("meta.json")
    }

    /// Create a new, empty collection
    pub fn create_collection(
        &self,
        collection_id: &str,
        source_path: PathBuf,
        registry: &FieldRegistry,
    ) -> Result<TantivyIndex> {
        validate_collection_id(collection_id)?;
        let collection_dir = self.collection_dir(collection_id);

        if collection_dir.exists() {
            return Err(VitrineError::CollectionAlreadyExists(
                collection_id.to_string(),
            ));
        }

        let metadata = CollectionMetadata::new(collection_id, source_path);
        let index = create_collection_at(&collection_dir, &metadata, registry)?;

        tracing::info!(collection = collection_id, "Created collection");
        Ok(index)
    }

    /// Open an existing collection
    pub fn open_collection(&self, collection_id: &str) -> Result<TantivyIndex> {
        validate_collection_id(collection_id)?;
        let tantivy_dir = self.tantivy_dir(collection_id);

        if !tantivy_dir.exists() {
            return Err(VitrineError::CollectionNotFound(collection_id.to_string()));
        }

        let metadata = self.get_collection_metadata(collection_id)?;
        if metadata.schema_version < SCHEMA_VERSION {
            return Err(VitrineError::InvalidCollection(format!(
                "Collection '{}' uses old schema version {} (current: v{}). \
                 Re-ingest it: vitrine ingest <file> --collection {} --force",
                collection_id, metadata.schema_version, SCHEMA_VERSION, collection_id
            )));
        }

        TantivyIndex::open(&tantivy_dir)
    }

    pub fn collection_exists(&self, collection_id: &str) -> bool {
        self.collection_dir(collection_id).exists()
    }

    pub fn delete_collection(&self, collection_id: &str) -> Result<()> {
        validate_collection_id(collection_id)?;
        let collection_dir = self.collection_dir(collection_id);

        if !collection_dir.exists() {
            return Err(VitrineError::CollectionNotFound(collection_id.to_string()));
        }

        fs::remove_dir_all(collection_dir)?;
        tracing::info!(collection = collection_id, "Deleted collection");
        Ok(())
    }

    pub fn get_collection_metadata(&self, collection_id: &str) -> Result<CollectionMetadata> {
        let meta_path = self.metadata_path(collection_id);

        if !meta_path.exists() {
            return Err(VitrineError::CollectionNotFound(collection_id.to_string()));
        }

        let contents = fs::read_to_string(&meta_path)?;
        let metadata: CollectionMetadata = serde_json::from_str(&contents)?;

        Ok(metadata)
    }

    pub fn update_collection_metadata(
        &self,
        collection_id: &str,
        metadata: &CollectionMetadata,
    ) -> Result<()> {
        write_metadata(&self.collection_dir(collection_id), metadata)
    }

    /// List all collections, sorted by id
    pub fn list_collections(&self) -> Result<Vec<CollectionMetadata>> {
        let collections_dir = self.collections_dir();

        if !collections_dir.exists() {
            return Ok(Vec::new());
        }

        let mut collections = Vec::new();
        for entry in fs::read_dir(collections_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(collection_id) = entry
                .file_name()
                .to_str()
                .filter(|name| !name.starts_with('.'))
            {
                match self.get_collection_metadata(collection_id) {
                    Ok(metadata) => collections.push(metadata),
                    Err(e) => {
                        tracing::warn!(collection = collection_id, error = %e, "Skipping unreadable collection")
                    }
                }
            }
        }

        collections.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(collections)
    }

    pub fn get_collection_path(&self, collection_id: &str) -> PathBuf {
        self.collection_dir(collection_id)
    }

    /// Load a tab-separated export into a collection
    ///
    /// Creates the collection, or re-creates it when `force` is set.
    ///
    /// # Errors
    ///
    /// `CollectionAlreadyExists` if the collection exists and `force` is false.
    pub fn ingest_file(
        &self,
        collection_id: &str,
        path: &Path,
        registry: &FieldRegistry,
        force: bool,
    ) -> Result<IngestStats> {
        let start = Instant::now();

        if !path.is_file() {
            return Err(VitrineError::IngestFailed(format!(
                "Not a readable file: {}",
                path.display()
            )));
        }

        validate_collection_id(collection_id)?;
        let previous = if self.collection_exists(collection_id) {
            if !force {
                return Err(VitrineError::CollectionAlreadyExists(
                    collection_id.to_string(),
                ));
            }
            self.get_collection_metadata(collection_id).ok()
        } else {
            None
        };

        // Built aside; the served collection is only replaced after commit
        let staging_dir = self.collections_dir().join(format!(".{collection_id}.staging"));
        if staging_dir.exists() {
            fs::remove_dir_all(&staging_dir)?;
        }

        let mut metadata = CollectionMetadata::new(collection_id, path.to_path_buf());
        if let Some(previous) = &previous {
            metadata.created_at = previous.created_at;
        }

        let mut stats = match self.build_staged(&staging_dir, &mut metadata, path, registry) {
            Ok(stats) => stats,
            Err(e) => {
                let _ = fs::remove_dir_all(&staging_dir);
                return Err(e);
            }
        };

        self.swap_in(collection_id, &staging_dir)?;

        stats.collection = collection_id.to_string();
        stats.duration_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            collection = collection_id,
            documents = stats.documents_indexed,
            skipped = stats.rows_skipped,
            duration_ms = stats.duration_ms,
            "Ingest complete"
        );

        Ok(stats)
    }

    fn build_staged(
        &self,
        staging_dir: &Path,
        metadata: &mut CollectionMetadata,
        path: &Path,
        registry: &FieldRegistry,
    ) -> Result<IngestStats> {
        let mut index = create_collection_at(staging_dir, metadata, registry)?;
        let stats = IngestPipeline::new(registry).ingest_file(path, &mut index)?;
        drop(index);

        metadata.last_ingested_at = Utc::now();
        metadata.documents_ingested = stats.documents_indexed;
        metadata.index_size_bytes = calculate_directory_size(staging_dir);
        write_metadata(staging_dir, metadata)?;
        Ok(stats)
    }

    /// Replace `collection_id` with the committed staging directory
    fn swap_in(&self, collection_id: &str, staging_dir: &Path) -> Result<()> {
        let target = self.collection_dir(collection_id);
        if !target.exists() {
            fs::rename(staging_dir, &target)?;
            return Ok(());
        }

        let retired = self.collections_dir().join(format!(".{collection_id}.old"));
        if retired.exists() {
            fs::remove_dir_all(&retired)?;
        }
        fs::rename(&target, &retired)?;
        if let Err(e) = fs::rename(staging_dir, &target) {
            fs::rename(&retired, &target)?;
            return Err(e.into());
        }
        if let Err(e) = fs::remove_dir_all(&retired) {
            tracing::warn!(collection = collection_id, error = %e, "Could not remove replaced index");
        }
        Ok(())
    }
}

fn validate_collection_id(collection_id: &str) -> Result<()> {
    let valid = !collection_id.is_empty()
        && collection_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(VitrineError::InvalidCollection(format!(
            "'{collection_id}' (use letters, digits, '-' and '_')"
        )))
    }
}

fn create_collection_at(
    dir: &Path,
    metadata: &CollectionMetadata,
    registry: &FieldRegistry,
) -> Result<TantivyIndex> {
    fs::create_dir_all(dir)?;
    let index = TantivyIndex::create(&dir.join("tantivy"), registry)?;
    write_metadata(dir, metadata)?;
    Ok(index)
}

fn write_metadata(dir: &Path, metadata: &CollectionMetadata) -> Result<()> {
    let json = serde_json::to_string_pretty(metadata)?;
    fs::write(dir.join("meta.json"), json)?;
    Ok(())
}

/// Calculate directory size recursively
fn calculate_directory_size(path: &Path) -> u64 {
    let mut total = 0;

    if path.is_dir() {
        if let Ok(entries) = fs::read_dir(path) {
            for entry in entries.filter_map(|e| e.ok()) {
                if let Ok(metadata) = entry.metadata() {
                    if metadata.is_dir() {
                        total += calculate_directory_size(&entry.path());
                    } else {
                        total += metadata.len();
                    }
                }
            }
        }
    } else if let Ok(metadata) = fs::metadata(path) {
        total = metadata.len();
    }

    total
}
