// Integration tests for collection storage and ingestion

use crate::common::{assert_valid_stats, create_test_services, ingest_export, ArtifactExport};
use serde_json::json;
use vitrine::core::backend::{LocalBackend, SearchBackend};
use vitrine::core::error::VitrineError;
use vitrine::core::storage::SCHEMA_VERSION;
use vitrine::core::types::SearchRequest;

#[tokio::test]
async fn test_ingest_then_list() {
    let (services, _temp) = create_test_services();
    let export = ArtifactExport::sample();
    let stats = ingest_export(&services, &export);
    assert_valid_stats(&stats, 12);
    assert_eq!(stats.rows_skipped, 0);

    let collections = services.storage.list_collections().unwrap();
    assert_eq!(collections.len(), 1);
    assert_eq!(collections[0].id, "artifacts");
    assert_eq!(collections[0].documents_ingested, 12);
    assert_eq!(collections[0].schema_version, SCHEMA_VERSION);
    assert_eq!(collections[0].source_path, export.path());
}

#[tokio::test]
async fn test_reingest_requires_force() {
    let (services, _temp) = create_test_services();
    ingest_export(&services, &ArtifactExport::sample());

    let smaller = ArtifactExport::with_rows(&[
        "1\tMEG-0001\tMegiddo\tbronze\tIron Age II\tjewelry\tB-101\tbead\t\t",
    ]);
    let result = services.storage.ingest_file(
        "artifacts",
        smaller.path(),
        &services.registry,
        false,
    );
    assert!(matches!(result, Err(VitrineError::CollectionAlreadyExists(_))));

    // Previous contents still served
    let response = services
        .catalog
        .search(&SearchRequest::default())
        .await
        .unwrap();
    assert_eq!(response.total, 12);

    ingest_export(&services, &smaller);
    let response = services
        .catalog
        .search(&SearchRequest::default())
        .await
        .unwrap();
    assert_eq!(response.total, 1);
}

#[tokio::test]
async fn test_unusable_rows_are_skipped() {
    let (services, _temp) = create_test_services();
    let export = ArtifactExport::with_rows(&[
        "1\tMEG-0001\tMegiddo\tbronze\tIron Age II\tjewelry\tB-101\tbead\t\t",
        "2\tMEG-0002\tMegiddo",
        "\tMEG-0003\tMegiddo\tglass\tIron Age II\tjewelry\tB-103\tbead\t\t",
        "4\tHAZ-0001\tHazor\tbronze\tLate Bronze\tweapon\tB-201\tarrowhead\t\t",
    ]);

    let stats = ingest_export(&services, &export);
    assert_valid_stats(&stats, 2);
    assert_eq!(stats.rows_skipped, 2);
}

#[test]
fn test_export_without_id_column_leaves_nothing_behind() {
    let (services, _temp) = create_test_services();
    let export = ArtifactExport::with_content("site_name_s\tmaterial_s\nMegiddo\tbronze\n");

    let result = services.storage.ingest_file(
        "artifacts",
        export.path(),
        &services.registry,
        false,
    );
    assert!(matches!(result, Err(VitrineError::IngestFailed(_))));
    assert!(!services.storage.collection_exists("artifacts"));
}

#[tokio::test]
async fn test_failed_force_reingest_keeps_serving_catalog() {
    let (services, _temp) = create_test_services();
    ingest_export(&services, &ArtifactExport::sample());

    let broken = ArtifactExport::with_content("site_name_s\tmaterial_s\nMegiddo\tbronze\n");
    let result = services.storage.ingest_file(
        "artifacts",
        broken.path(),
        &services.registry,
        true,
    );
    assert!(matches!(result, Err(VitrineError::IngestFailed(_))));
    assert!(services.storage.collection_exists("artifacts"));

    let response = services
        .catalog
        .search(&SearchRequest::default())
        .await
        .unwrap();
    assert_eq!(response.total, 12);
    assert_eq!(services.storage.list_collections().unwrap().len(), 1);
}

#[test]
fn test_invalid_collection_name() {
    let (services, _temp) = create_test_services();
    let export = ArtifactExport::sample();

    let result = services.storage.ingest_file(
        "../artifacts",
        export.path(),
        &services.registry,
        false,
    );
    assert!(matches!(result, Err(VitrineError::InvalidCollection(_))));
}

#[tokio::test]
async fn test_multi_valued_column_kept_as_list() {
    let (services, _temp) = create_test_services();
    ingest_export(&services, &ArtifactExport::sample());

    let backend = LocalBackend::new(
        services.storage.clone(),
        "artifacts".to_string(),
        services.registry.clone(),
    );
    let record = backend.document("1").await.unwrap().expect("Record missing");
    assert_eq!(record["Artifacts_THUMBNAILS_ss"], json!(["img/1a.jpg", "img/1b.jpg"]));
    assert_eq!(record["site_name_s"], json!("Megiddo"));

    // Empty cells are not stored
    let record = backend.document("3").await.unwrap().unwrap();
    assert!(!record.contains_key("THUMBNAIL_s"));
}

#[tokio::test]
async fn test_old_schema_collection_rejected() {
    let (services, _temp) = create_test_services();
    ingest_export(&services, &ArtifactExport::sample());

    let mut metadata = services.storage.get_collection_metadata("artifacts").unwrap();
    metadata.schema_version = 0;
    services
        .storage
        .update_collection_metadata("artifacts", &metadata)
        .unwrap();

    assert!(matches!(
        services.catalog.search(&SearchRequest::default()).await,
        Err(VitrineError::InvalidCollection(_))
    ));
}

#[tokio::test]
async fn test_delete_collection() {
    let (services, _temp) = create_test_services();
    ingest_export(&services, &ArtifactExport::sample());

    services.storage.delete_collection("artifacts").unwrap();
    assert!(services.storage.list_collections().unwrap().is_empty());
    assert!(matches!(
        services.catalog.search(&SearchRequest::default()).await,
        Err(VitrineError::CollectionNotFound(_))
    ));
}
