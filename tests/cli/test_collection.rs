//! Tests for ingest and collection management CLI commands
//!
//! Covers:
//! - ingest: loading an export, refusing to overwrite without --force
//! - list-collections: empty and populated storage
//! - delete-collection: forced delete and missing collections

use crate::cli::test_helpers::{create_cli_test_services, create_loaded_cli_services};
use crate::common::ArtifactExport;
use vitrine::cli::commands::collection::{execute_delete, execute_list, DeleteArgs, ListArgs};
use vitrine::cli::commands::ingest::{execute as execute_ingest, IngestArgs};
use vitrine::cli::OutputFormat;

/// Test ingesting an export into the default collection
#[tokio::test]
async fn test_ingest_default_collection() {
    let (services, _storage_temp) = create_cli_test_services();
    let export = ArtifactExport::sample();

    let args = IngestArgs {
        path: export.path().to_path_buf(),
        collection: None,
        force: false,
    };
    let result = execute_ingest(args, &services, OutputFormat::Human).await;
    assert!(result.is_ok(), "Ingest should succeed: {:?}", result.err());

    let metadata = services.storage.get_collection_metadata("artifacts").unwrap();
    assert_eq!(metadata.documents_ingested, 12);
}

/// Test ingesting into a named collection with JSON output
#[tokio::test]
async fn test_ingest_named_collection_json() {
    let (services, _storage_temp) = create_cli_test_services();
    let export = ArtifactExport::many_sites(3);

    let args = IngestArgs {
        path: export.path().to_path_buf(),
        collection: Some("survey-2024".to_string()),
        force: false,
    };
    assert!(execute_ingest(args, &services, OutputFormat::Json).await.is_ok());
    assert!(services.storage.collection_exists("survey-2024"));
    assert!(!services.storage.collection_exists("artifacts"));
}

/// Test that re-ingesting needs --force
#[tokio::test]
async fn test_ingest_existing_requires_force() {
    let (services, _storage_temp) = create_loaded_cli_services();
    let export = ArtifactExport::many_sites(2);

    let args = IngestArgs {
        path: export.path().to_path_buf(),
        collection: None,
        force: false,
    };
    assert!(execute_ingest(args, &services, OutputFormat::Human).await.is_err());
    let metadata = services.storage.get_collection_metadata("artifacts").unwrap();
    assert_eq!(metadata.documents_ingested, 12);

    let args = IngestArgs {
        path: export.path().to_path_buf(),
        collection: None,
        force: true,
    };
    assert!(execute_ingest(args, &services, OutputFormat::Human).await.is_ok());
    let metadata = services.storage.get_collection_metadata("artifacts").unwrap();
    assert_eq!(metadata.documents_ingested, 4);
}

/// Test ingesting a file that does not exist
#[tokio::test]
async fn test_ingest_missing_file() {
    let (services, storage_temp) = create_cli_test_services();

    let args = IngestArgs {
        path: storage_temp.path().join("missing.tsv"),
        collection: None,
        force: false,
    };
    assert!(execute_ingest(args, &services, OutputFormat::Human).await.is_err());
    assert!(services.storage.list_collections().unwrap().is_empty());
}

/// Test listing collections in both formats
#[tokio::test]
async fn test_list_collections() {
    let (services, _storage_temp) = create_cli_test_services();
    assert!(execute_list(ListArgs {}, &services, OutputFormat::Human)
        .await
        .is_ok());

    let (services, _storage_temp) = create_loaded_cli_services();
    for format in [OutputFormat::Human, OutputFormat::Json] {
        let result = execute_list(ListArgs {}, &services, format).await;
        assert!(result.is_ok(), "List should succeed: {:?}", result.err());
    }
}

/// Test forced delete
#[tokio::test]
async fn test_delete_collection_forced() {
    let (services, _storage_temp) = create_loaded_cli_services();

    let args = DeleteArgs {
        collection: "artifacts".to_string(),
        force: true,
    };
    assert!(execute_delete(args, &services, OutputFormat::Json).await.is_ok());
    assert!(!services.storage.collection_exists("artifacts"));
}

/// Test deleting a collection that does not exist
#[tokio::test]
async fn test_delete_missing_collection() {
    let (services, _storage_temp) = create_cli_test_services();

    let args = DeleteArgs {
        collection: "nope".to_string(),
        force: true,
    };
    assert!(execute_delete(args, &services, OutputFormat::Human).await.is_err());
}
