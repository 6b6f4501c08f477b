//! Suggest command - complete partial search input

use crate::cli::OutputFormat;
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

/// Arguments for the suggest command
#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// Partial search input
    pub partial: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub partial: String,
    pub suggestions: Vec<String>,
}

/// Execute the suggest command
pub async fn execute(
    args: SuggestArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let suggestions = services.catalog.suggest(&args.partial).await?;

    match format {
        OutputFormat::Human => {
            for suggestion in &suggestions {
                println!("{suggestion}");
            }
        }
        OutputFormat::Json => {
            let response = SuggestResponse {
                partial: args.partial,
                suggestions,
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
