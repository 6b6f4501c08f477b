//! Ingest command - load a tab-separated export into a collection

use crate::cli::output::{colors, format_duration};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the ingest command
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Path to the tab-separated export
    pub path: PathBuf,

    /// Collection name (defaults to the configured collection)
    #[arg(long, short = 'c')]
    pub collection: Option<String>,

    /// Replace the collection if it already exists
    #[arg(long, short = 'f')]
    pub force: bool,
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub collection: String,
    pub source_path: String,
    pub documents_indexed: usize,
    pub rows_skipped: usize,
    pub duration_secs: f64,
}

/// Execute the ingest command
pub async fn execute(
    args: IngestArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = args
        .path
        .canonicalize()
        .map_err(|e| format!("Cannot read '{}': {e}", args.path.display()))?;
    let collection = args
        .collection
        .unwrap_or_else(|| services.config.storage.collection.clone());

    if services.storage.collection_exists(&collection) && !args.force {
        return Err(format!(
            "Collection '{collection}' already exists. Use --force to replace it."
        )
        .into());
    }

    if format == OutputFormat::Human {
        eprintln!(
            "Ingesting {} into '{}'...",
            colors::file_path(&path.display().to_string()),
            colors::collection_id(&collection)
        );
    }

    // Tantivy writes are blocking
    let storage = Arc::clone(&services.storage);
    let registry = Arc::clone(&services.registry);
    let (id, source, force) = (collection.clone(), path.clone(), args.force);
    let stats = tokio::task::spawn_blocking(move || {
        storage.ingest_file(&id, &source, &registry, force)
    })
    .await??;

    let response = IngestResponse {
        collection,
        source_path: path.display().to_string(),
        documents_indexed: stats.documents_indexed,
        rows_skipped: stats.rows_skipped,
        duration_secs: stats.duration_ms as f64 / 1000.0,
    };

    match format {
        OutputFormat::Human => {
            println!(
                "{} {} records into '{}' in {}",
                colors::success("Ingested"),
                colors::number(&response.documents_indexed.to_string()),
                colors::collection_id(&response.collection),
                format_duration(response.duration_secs)
            );
            if response.rows_skipped > 0 {
                println!(
                    "{}",
                    colors::warning(&format!("{} rows skipped (see log)", response.rows_skipped))
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
