//! Info command - version, backend and catalog summary

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::registry::FieldRole;
use crate::core::services::Services;
use crate::core::storage::SCHEMA_VERSION;
use clap::Args;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Arguments for the info command
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Show detailed information
    #[arg(long, short = 'd')]
    pub detailed: bool,
}

/// Catalog and backend summary
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub name: String,
    pub version: String,
    pub backend: String,
    /// Collection the local backend serves
    pub collection: String,
    pub title_field: String,
    pub fields: usize,
    /// Field count per role, keyed by role name
    pub roles: BTreeMap<&'static str, usize>,
    pub schema_version: u32,
    pub autocomplete: bool,
    pub data_dir: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collections: Option<usize>,
}

const ROLES: [FieldRole; 5] = [
    FieldRole::Searchable,
    FieldRole::Facetable,
    FieldRole::Sortable,
    FieldRole::IndexDisplayed,
    FieldRole::ShowDisplayed,
];

/// Collect the summary; `detailed` also counts stored collections
pub fn gather(services: &Services, detailed: bool) -> crate::core::error::Result<InfoResponse> {
    let registry = &services.registry;
    let collections = match detailed {
        true => Some(services.storage.list_collections()?.len()),
        false => None,
    };

    Ok(InfoResponse {
        name: "vitrine".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: services.catalog.backend_name().to_string(),
        collection: services.config.storage.collection.clone(),
        title_field: registry.title_field().to_string(),
        fields: registry.len(),
        roles: ROLES
            .iter()
            .map(|role| (role.as_str(), registry.fields_with_role(*role).len()))
            .collect(),
        schema_version: SCHEMA_VERSION,
        autocomplete: services.catalog.autocomplete_enabled(),
        data_dir: services.storage.storage_root().display().to_string(),
        collections,
    })
}

/// Execute the info command
pub async fn execute(
    args: InfoArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let info = gather(services, args.detailed)?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{} {}", colors::label(&info.name), info.version);
    println!("  Backend:      {} ({})", info.backend, colors::collection_id(&info.collection));
    println!("  Title field:  {}", info.title_field);
    let roles: Vec<String> = info
        .roles
        .iter()
        .map(|(role, count)| format!("{count} {role}"))
        .collect();
    println!("  Fields:       {} [{}]", info.fields, roles.join(", "));
    println!("  Schema:       v{}", info.schema_version);
    println!(
        "  Autocomplete: {}",
        if info.autocomplete { "on" } else { "off" }
    );
    println!("  Data:         {}", colors::file_path(&info.data_dir));
    if let Some(count) = info.collections {
        println!("  Collections:  {}", colors::number(&count.to_string()));
    }

    Ok(())
}
