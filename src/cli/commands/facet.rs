//! Facet command - list every value of one facet

use crate::cli::output::print_facet;
use crate::cli::OutputFormat;
use crate::cli::commands::RequestArgs;
use crate::core::services::Services;
use clap::Args;
use std::sync::Arc;

/// Arguments for the facet command
#[derive(Args, Debug)]
pub struct FacetArgs {
    /// Facet field name (e.g. site_name_s)
    pub facet: String,

    #[command(flatten)]
    pub request: RequestArgs,
}

/// Execute the facet command
pub async fn execute(
    args: FacetArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = args.request.to_request()?;
    let facet = services.catalog.facet(&request, &args.facet).await?;

    match format {
        OutputFormat::Human => {
            if facet.values.is_empty() {
                println!("No values for '{}'", facet.label);
            } else {
                print_facet(&facet);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&facet)?);
        }
    }

    Ok(())
}
