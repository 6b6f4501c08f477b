//! Collection commands - list and delete local collections
//!
//! - `list-collections`
//! - `delete-collection`

use crate::cli::output::{colors, format_bytes, format_relative_time, print_header};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::storage::CollectionMetadata;
use clap::Args;
use serde::Serialize;
use std::io::{self, Write};
use std::sync::Arc;

/// Arguments for collection list
#[derive(Args, Debug)]
pub struct ListArgs {}

/// Arguments for collection delete
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Collection name
    pub collection: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'f')]
    pub force: bool,
}

/// Collection as reported by `list-collections --format json`
#[derive(Debug, Serialize)]
pub struct CollectionListItem {
    pub id: String,
    /// True for the collection the catalog searches (`storage.collection`)
    pub served: bool,
    pub documents: usize,
    pub size_bytes: u64,
    pub schema_version: u32,
    pub source_path: String,
    pub ingested_at: String,
}

impl CollectionListItem {
    fn from_metadata(meta: &CollectionMetadata, served_id: &str) -> Self {
        Self {
            id: meta.id.clone(),
            served: meta.id == served_id,
            documents: meta.documents_ingested,
            size_bytes: meta.index_size_bytes,
            schema_version: meta.schema_version,
            source_path: meta.source_path.display().to_string(),
            ingested_at: meta.last_ingested_at.to_rfc3339(),
        }
    }
}

/// Collection list response
#[derive(Debug, Serialize)]
pub struct CollectionListResponse {
    pub count: usize,
    pub collections: Vec<CollectionListItem>,
}

/// Execute list-collections command
pub async fn execute_list(
    _args: ListArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let served_id = services.config.storage.collection.as_str();
    let collections = services.storage.list_collections()?;

    if format == OutputFormat::Json {
        let response = CollectionListResponse {
            count: collections.len(),
            collections: collections
                .iter()
                .map(|meta| CollectionListItem::from_metadata(meta, served_id))
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if collections.is_empty() {
        println!(
            "No collections yet. Load an export with '{}'.",
            colors::label("vitrine ingest <export.tsv>")
        );
        return Ok(());
    }

    print_header(&format!("Collections ({}):", collections.len()));
    for meta in &collections {
        let marker = if meta.id == served_id { "*" } else { " " };
        println!(
            "{marker} {:<20} {:>8} records  {:>10}  {}  {}",
            colors::collection_id(&meta.id),
            colors::number(&meta.documents_ingested.to_string()),
            colors::number(&format_bytes(meta.index_size_bytes)),
            colors::dim(&format_relative_time(&meta.last_ingested_at)),
            colors::file_path(&meta.source_path.display().to_string())
        );
    }

    Ok(())
}

/// Execute delete-collection command
pub async fn execute_delete(
    args: DeleteArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if !services.storage.collection_exists(&args.collection) {
        return Err(format!(
            "Collection '{}' not found. Run 'vitrine list-collections' to see available collections.",
            args.collection
        )
        .into());
    }

    // Confirmation prompt unless --force
    if !args.force {
        print!(
            "Delete collection '{}'? [y/N] ",
            colors::collection_id(&args.collection)
        );
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("{}", colors::dim("Cancelled."));
            return Ok(());
        }
    }

    services.storage.delete_collection(&args.collection)?;

    match format {
        OutputFormat::Human => {
            println!(
                "{} collection '{}'",
                colors::success("Deleted"),
                colors::collection_id(&args.collection)
            );
        }
        OutputFormat::Json => {
            let response = serde_json::json!({
                "deleted": true,
                "collection": args.collection
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
