//! Core domain logic (adapter-agnostic)
//!
//! This module contains all catalog logic that is independent
//! of the command-line adapter.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Requests, index queries and view models
//! - **xdg**: XDG directory handling
//! - **registry**: Field and action registries
//! - **search**: Query building, projection, retries, autocomplete
//! - **backend**: Tantivy and Solr search backends
//! - **storage**: Local collections and their Tantivy indexes
//! - **ingest**: Tab-separated export loading
//! - **services**: Unified service container

pub mod backend;
pub mod config;
pub mod error;
pub mod ingest;
pub mod registry;
pub mod search;
pub mod services;
pub mod storage;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{Result, VitrineError};
pub use services::Services;
