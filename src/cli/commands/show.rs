//! Show command - display one artifact record

use crate::cli::output::{colors, display_title, format_field_values};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use clap::Args;
use std::sync::Arc;

/// Arguments for the show command
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Record id
    pub id: String,
}

/// Execute the show command
pub async fn execute(
    args: ShowArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let view = services.catalog.document(&args.id).await?;

    match format {
        OutputFormat::Human => {
            println!("{}", colors::title(display_title(&view.id, &view.title)));
            if let Some(thumbnail) = &view.thumbnail {
                println!("  {}: {}", colors::label("Thumbnail"), colors::file_path(thumbnail));
            }

            let width = view.fields.iter().map(|f| f.label.len()).max().unwrap_or(0);
            for field in &view.fields {
                println!(
                    "  {}: {}",
                    colors::label(&format!("{:<width$}", field.label)),
                    format_field_values(&field.values)
                );
            }

            if !view.actions.is_empty() {
                let actions: Vec<&str> = view.actions.iter().map(|a| a.as_str()).collect();
                println!("\n  {}", colors::dim(&format!("Tools: {}", actions.join(", "))));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
    }

    Ok(())
}
