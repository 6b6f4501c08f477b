//! Vitrine - Faceted Search for the MMAP Artifact Catalog
//!
//! Maps catalog search requests onto a search index and index
//! responses back into view-ready results: documents with labelled
//! fields, facet value lists with counts, pagination and spelling
//! suggestions.
//!
//! # Architecture
//!
//! The codebase is organized into two main modules:
//!
//! - **core**: Domain logic (adapter-agnostic)
//!   - config, error, types, xdg
//!   - registry (field definitions, embedded catalog, UI actions)
//!   - search (query builder, response projector, catalog service)
//!   - backend (embedded Tantivy, remote Solr)
//!   - storage, ingest (local collections from tab-separated exports)
//!   - services (unified service container)
//!
//! - **cli**: Command-line adapter (depends on core)
//!
//! # Key Features
//!
//! - Every request validated against the field registry before the index is contacted
//! - Facet "more" detection by requesting one value beyond the display limit
//! - Transient index failures retried with backoff, never reported as empty results
//! - Interchangeable local (Tantivy) and remote (Solr) backends

// Core domain logic (adapter-agnostic)
pub mod core;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{Result, VitrineError};
pub use core::registry::{artifact_registry, FieldRegistry};
pub use core::search::CatalogService;
pub use core::services::Services;
pub use core::storage::{CollectionMetadata, StorageManager};
pub use core::types::*;
