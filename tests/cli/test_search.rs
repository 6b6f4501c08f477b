//! Tests for search, facet, show and suggest CLI commands
//!
//! Tests the read-side command handlers with various scenarios:
//! - Queries with and without results
//! - Filters, sorting and page sizes from command-line arguments
//! - Record display and missing records
//! - Output format variations

use crate::cli::test_helpers::{create_cli_test_services, create_loaded_cli_services, request_args};
use crate::common::create_test_services_with;
use crate::common::{ingest_export, ArtifactExport};
use vitrine::cli::commands::facet::{execute as execute_facet, FacetArgs};
use vitrine::cli::commands::search::{execute, parse_filter, SearchArgs};
use vitrine::cli::commands::show::{execute as execute_show, ShowArgs};
use vitrine::cli::commands::suggest::{execute as execute_suggest, SuggestArgs};
use vitrine::cli::OutputFormat;
use vitrine::core::types::{Operator, SortDirection};

fn search_args(query: &str) -> SearchArgs {
    SearchArgs {
        request: request_args(query),
        expand: None,
        no_facets: false,
    }
}

/// Test search with valid query returning results
#[tokio::test]
async fn test_search_valid_query_human() {
    let (services, _storage_temp) = create_loaded_cli_services();

    let result = execute(search_args("bronze"), &services, OutputFormat::Human).await;
    assert!(result.is_ok(), "Search should succeed: {:?}", result.err());
}

/// Test search with valid query in JSON format
#[tokio::test]
async fn test_search_valid_query_json() {
    let (services, _storage_temp) = create_loaded_cli_services();

    let mut args = search_args("");
    args.request.filters = vec![("site_name_s".to_string(), "Megiddo".to_string())];
    args.expand = Some("material_s".to_string());

    let result = execute(args, &services, OutputFormat::Json).await;
    assert!(
        result.is_ok(),
        "JSON search should succeed: {:?}",
        result.err()
    );
}

/// Test search with no matches
#[tokio::test]
async fn test_search_empty_results() {
    let (services, _storage_temp) = create_loaded_cli_services();

    let mut args = search_args("nonexistent_artifact_xyz");
    args.no_facets = true;

    let result = execute(args, &services, OutputFormat::Human).await;
    assert!(result.is_ok(), "Search with no results should succeed");
}

/// Test search before anything was ingested
#[tokio::test]
async fn test_search_collection_not_found() {
    let (services, _storage_temp) = create_cli_test_services();

    let result = execute(search_args("bronze"), &services, OutputFormat::Human).await;
    assert!(result.is_err(), "Search without a collection should fail");
}

/// Test rejected request options
#[tokio::test]
async fn test_search_invalid_options() {
    let (services, _storage_temp) = create_loaded_cli_services();

    let mut args = search_args("");
    args.request.per_page = Some(25);
    assert!(execute(args, &services, OutputFormat::Human).await.is_err());

    let mut args = search_args("");
    args.request.sort = Some("comments_s desc".to_string());
    assert!(execute(args, &services, OutputFormat::Human).await.is_err());

    let mut args = search_args("");
    args.request.filters = vec![("comments_s".to_string(), "bead".to_string())];
    assert!(execute(args, &services, OutputFormat::Human).await.is_err());

    let mut args = search_args("bronze");
    args.request.operator = Some("XOR".to_string());
    assert!(execute(args, &services, OutputFormat::Human).await.is_err());
}

/// Test conversion of command-line arguments into a catalog request
#[test]
fn test_request_args_to_request() {
    let mut args = request_args("bronze bead");
    args.search_field = Some("comments_s".to_string());
    args.filters = vec![
        ("site_name_s".to_string(), "Megiddo".to_string()),
        ("site_name_s".to_string(), "Hazor".to_string()),
    ];
    args.page = 3;
    args.per_page = Some(160);
    args.sort = Some("bag_id_s desc".to_string());
    args.operator = Some("or".to_string());

    let request = args.to_request().unwrap();
    assert_eq!(request.query, "bronze bead");
    assert_eq!(request.search_field.as_deref(), Some("comments_s"));
    assert_eq!(request.filters["site_name_s"], vec!["Megiddo", "Hazor"]);
    assert_eq!(request.page, 3);
    assert_eq!(request.per_page, Some(160));
    let sort = request.sort.unwrap();
    assert_eq!(sort.field, "bag_id_s");
    assert_eq!(sort.direction, SortDirection::Desc);
    assert_eq!(request.operator, Some(Operator::Or));

    let mut args = request_args("");
    args.sort = Some("relevance".to_string());
    assert!(args.to_request().unwrap().sort.is_none());
}

/// Test FIELD=VALUE filter parsing
#[test]
fn test_parse_filter() {
    assert_eq!(
        parse_filter("site_name_s=Tel Dor").unwrap(),
        ("site_name_s".to_string(), "Tel Dor".to_string())
    );
    assert_eq!(
        parse_filter("period_s=Iron Age II=a").unwrap(),
        ("period_s".to_string(), "Iron Age II=a".to_string())
    );
    assert!(parse_filter("site_name_s").is_err());
    assert!(parse_filter("=Megiddo").is_err());
}

/// Test expanded facet listing
#[tokio::test]
async fn test_facet_command() {
    let (services, _storage_temp) = create_loaded_cli_services();

    let args = FacetArgs {
        facet: "site_name_s".to_string(),
        request: request_args(""),
    };
    assert!(execute_facet(args, &services, OutputFormat::Human).await.is_ok());

    let args = FacetArgs {
        facet: "material_s".to_string(),
        request: request_args("jewelry"),
    };
    assert!(execute_facet(args, &services, OutputFormat::Json).await.is_ok());

    let args = FacetArgs {
        facet: "comments_s".to_string(),
        request: request_args(""),
    };
    assert!(execute_facet(args, &services, OutputFormat::Human).await.is_err());
}

/// Test record display
#[tokio::test]
async fn test_show_command() {
    let (services, _storage_temp) = create_loaded_cli_services();

    for format in [OutputFormat::Human, OutputFormat::Json] {
        let args = ShowArgs { id: "1".to_string() };
        let result = execute_show(args, &services, format).await;
        assert!(result.is_ok(), "Show should succeed: {:?}", result.err());
    }

    let args = ShowArgs {
        id: "404".to_string(),
    };
    assert!(execute_show(args, &services, OutputFormat::Human).await.is_err());
}

/// Test suggestions with autocomplete off and on
#[tokio::test]
async fn test_suggest_command() {
    let (services, _storage_temp) = create_loaded_cli_services();
    let args = SuggestArgs {
        partial: "bro".to_string(),
    };
    assert!(
        execute_suggest(args, &services, OutputFormat::Human).await.is_err(),
        "Autocomplete is disabled by default"
    );

    let (services, _storage_temp) =
        create_test_services_with(|config| config.autocomplete.enabled = true);
    ingest_export(&services, &ArtifactExport::sample());
    for format in [OutputFormat::Human, OutputFormat::Json] {
        let args = SuggestArgs {
            partial: "gla".to_string(),
        };
        assert!(execute_suggest(args, &services, format).await.is_ok());
    }
}
