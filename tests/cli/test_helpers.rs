//! CLI test helpers
//!
//! Provides utilities for testing CLI commands including:
//! - Arc<Services> wrappers matching CLI execute() signatures
//! - Collections pre-loaded with the sample export

use crate::common::{create_test_services, ingest_export, ArtifactExport};
use vitrine::cli::commands::RequestArgs;
use vitrine::core::services::Services;
use std::sync::Arc;
use tempfile::TempDir;

/// Create test services wrapped in Arc (matching CLI execute() signatures)
pub fn create_cli_test_services() -> (Arc<Services>, TempDir) {
    create_test_services()
}

/// Services whose default collection holds the sample export
pub fn create_loaded_cli_services() -> (Arc<Services>, TempDir) {
    let (services, temp_dir) = create_test_services();
    ingest_export(&services, &ArtifactExport::sample());
    (services, temp_dir)
}

/// Request arguments for a plain query, everything else defaulted
pub fn request_args(query: &str) -> RequestArgs {
    RequestArgs {
        query: query.to_string(),
        page: 1,
        ..Default::default()
    }
}
