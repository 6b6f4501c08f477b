// Test helper functions

use super::fixtures::ArtifactExport;
use vitrine::core::config::Config;
use vitrine::core::services::Services;
use vitrine::core::types::{IngestStats, RawDocument};
use std::sync::Arc;
use tempfile::TempDir;

/// Create test services with temporary storage
///
/// The returned TempDir must be kept alive for the duration of the test.
#[allow(dead_code)] // Used in integration tests
pub fn create_test_services() -> (Arc<Services>, TempDir) {
    create_test_services_with(|_| {})
}

/// Create test services after adjusting the default configuration
#[allow(dead_code)] // Used in integration tests
pub fn create_test_services_with<F>(adjust: F) -> (Arc<Services>, TempDir)
where
    F: FnOnce(&mut Config),
{
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = Config::default();
    config.storage.index_dir = temp_dir.path().to_path_buf();
    config.backend.retry_min_delay_ms = 1;
    config.backend.retry_max_delay_ms = 5;
    adjust(&mut config);

    let services = Services::new(config).expect("Failed to create services");
    (Arc::new(services), temp_dir)
}

/// Ingest an export into the configured collection
#[allow(dead_code)] // Used in integration tests
pub fn ingest_export(services: &Services, export: &ArtifactExport) -> IngestStats {
    services
        .storage
        .ingest_file(
            &services.config.storage.collection,
            export.path(),
            &services.registry,
            true,
        )
        .expect("Failed to ingest export")
}

/// Services with the sample export already ingested
#[allow(dead_code)] // Used in integration tests
pub fn sample_services() -> (Arc<Services>, TempDir) {
    let (services, temp_dir) = create_test_services();
    let export = ArtifactExport::sample();
    ingest_export(&services, &export);
    (services, temp_dir)
}

/// JSON object literal as a raw document
#[allow(dead_code)] // Used in integration tests
pub fn record(value: serde_json::Value) -> RawDocument {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// Assert that ingest stats are valid
#[allow(dead_code)] // Used in integration tests
pub fn assert_valid_stats(stats: &IngestStats, expected_documents: usize) {
    assert_eq!(
        stats.documents_indexed, expected_documents,
        "Expected {} documents indexed, got {}",
        expected_documents, stats.documents_indexed
    );
    assert!(
        !stats.collection.is_empty(),
        "Expected the collection name in ingest stats"
    );
}
