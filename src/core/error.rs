//! Error types and error handling for Vitrine.
//!
//! This module defines the error type used throughout the
//! library. Validation failures are raised before any call to the
//! search index; transport failures are classified as transient so
//! the catalog service can retry them.

use thiserror::Error;

/// Result type alias for Vitrine operations
pub type Result<T> = std::result::Result<T, VitrineError>;

/// Main error type for Vitrine
#[derive(Error, Debug)]
pub enum VitrineError {
    #[error("Field already registered: {0}")]
    DuplicateField(String),

    #[error("Unknown facet field: {0}")]
    UnknownFacetField(String),

    #[error("Unknown search field: {0}")]
    UnknownSearchField(String),

    #[error("Invalid page size {requested} (allowed: {allowed:?})")]
    InvalidPageSize {
        requested: usize,
        allowed: Vec<usize>,
    },

    #[error("Invalid sort field: {0}")]
    InvalidSortField(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Autocomplete is disabled")]
    AutocompleteDisabled,

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Search index unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Search index request timed out after {0}ms")]
    Timeout(u64),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed index response: {0}")]
    MalformedResponse(String),

    #[error("Search failed: {0}")]
    SearchFailed(String),

    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Collection already exists: {0}")]
    CollectionAlreadyExists(String),

    #[error("Invalid collection: {0}")]
    InvalidCollection(String),

    #[error("Ingest failed: {0}")]
    IngestFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl VitrineError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if the failure may succeed when the same read is repeated
    pub fn is_transient(&self) -> bool {
        matches!(self, VitrineError::Timeout(_) | VitrineError::Transport(_))
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            VitrineError::DocumentNotFound(_) | VitrineError::CollectionNotFound(_)
        )
    }

    /// Check if this is a conflict error (already exists)
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            VitrineError::CollectionAlreadyExists(_) | VitrineError::DuplicateField(_)
        )
    }

    /// Check if this is a bad request error (invalid input)
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            VitrineError::UnknownFacetField(_)
                | VitrineError::UnknownSearchField(_)
                | VitrineError::InvalidPageSize { .. }
                | VitrineError::InvalidSortField(_)
                | VitrineError::InvalidQuery(_)
                | VitrineError::AutocompleteDisabled
                | VitrineError::InvalidCollection(_)
                | VitrineError::ConfigError(_)
        )
    }
}
