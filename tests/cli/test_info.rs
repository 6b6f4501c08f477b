//! Tests for get-server-info, show-config and list-fields CLI commands
//!
//! These are simple commands that display static/config information.

use crate::cli::test_helpers::{create_cli_test_services, create_loaded_cli_services};
use vitrine::cli::commands::config::{execute as execute_config, ConfigArgs};
use vitrine::cli::commands::fields::{execute as execute_fields, FieldItem, FieldsArgs, RoleArg};
use vitrine::cli::commands::info::{execute as execute_info, InfoArgs};
use vitrine::cli::OutputFormat;
use vitrine::core::registry::FieldRole;

// =============================================================================
// get-server-info tests
// =============================================================================

/// Test getting server info (human format)
#[tokio::test]
async fn test_server_info_human() {
    let (services, _storage_temp) = create_cli_test_services();

    let args = InfoArgs { detailed: false };
    let result = execute_info(args, &services, OutputFormat::Human).await;
    assert!(result.is_ok(), "Get server info should succeed");
}

/// Test getting server info (JSON format)
#[tokio::test]
async fn test_server_info_json() {
    let (services, _storage_temp) = create_cli_test_services();

    let args = InfoArgs { detailed: false };
    let result = execute_info(args, &services, OutputFormat::Json).await;
    assert!(result.is_ok(), "Get server info (JSON) should succeed");
}

/// Test getting detailed server info
#[tokio::test]
async fn test_server_info_detailed() {
    let (services, _storage_temp) = create_loaded_cli_services();

    let args = InfoArgs { detailed: true };
    let result = execute_info(args, &services, OutputFormat::Human).await;
    assert!(result.is_ok(), "Get detailed server info should succeed");
}

// =============================================================================
// show-config tests
// =============================================================================

/// Test showing config in every format
#[tokio::test]
async fn test_show_config() {
    let (services, _storage_temp) = create_cli_test_services();

    for format in [OutputFormat::Human, OutputFormat::Json] {
        let args = ConfigArgs { toml: false };
        assert!(execute_config(args, &services, format).await.is_ok());
    }

    let args = ConfigArgs { toml: true };
    assert!(execute_config(args, &services, OutputFormat::Human).await.is_ok());
}

/// Test that printed TOML loads back into the same settings
#[test]
fn test_config_toml_round_trip() {
    let (services, _storage_temp) = create_cli_test_services();

    let text = toml::to_string_pretty(services.config.as_ref()).unwrap();
    let parsed: vitrine::Config = toml::from_str(&text).unwrap();
    assert_eq!(parsed.storage.collection, services.config.storage.collection);
    assert_eq!(
        parsed.search.per_page_options,
        services.config.search.per_page_options
    );
}

// =============================================================================
// list-fields tests
// =============================================================================

/// Test listing fields
#[tokio::test]
async fn test_list_fields() {
    let (services, _storage_temp) = create_cli_test_services();

    let args = FieldsArgs { role: None };
    assert!(execute_fields(args, &services, OutputFormat::Human).await.is_ok());

    let args = FieldsArgs {
        role: Some(RoleArg::Facetable),
    };
    assert!(execute_fields(args, &services, OutputFormat::Json).await.is_ok());
}

/// Test the field summary used by list-fields
#[test]
fn test_field_item_from_definition() {
    let (services, _storage_temp) = create_cli_test_services();

    let site = services.registry.get("site_name_s").unwrap();
    let item = FieldItem::from(site);
    assert_eq!(item.label, "Site Name");
    assert!(item.roles.contains(&"facetable"));
    assert!(item.sort_label.is_some());

    assert_eq!(FieldRole::from(RoleArg::Show), FieldRole::ShowDisplayed);
}
