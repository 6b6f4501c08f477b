//! Config command - show current configuration

use crate::cli::OutputFormat;
use crate::core::services::Services;
use clap::Args;
use std::sync::Arc;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Print as TOML, ready to save as a config file
    #[arg(long)]
    pub toml: bool,
}

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = &services.config;

    if args.toml {
        print!("{}", toml::to_string_pretty(config.as_ref())?);
        return Ok(());
    }

    match format {
        OutputFormat::Human => {
            println!("Configuration:");
            println!("  backend:");
            println!("    kind: {:?}", config.backend.kind);
            println!("    solr_url: {}", config.backend.solr_url);
            println!("    request_timeout_ms: {}", config.backend.request_timeout_ms);
            println!("    max_retries: {}", config.backend.max_retries);
            println!("  storage:");
            println!("    index_dir: {}", config.storage.index_dir.display());
            println!("    collection: {}", config.storage.collection);
            println!("  search:");
            println!("    per_page_options: {:?}", config.search.per_page_options);
            println!("    default_per_page: {}", config.search.default_per_page);
            println!("    default_facet_limit: {}", config.search.default_facet_limit);
            println!("    expanded_facet_limit: {}", config.search.expanded_facet_limit);
            println!("    spellcheck: {} (max {})", config.search.spellcheck, config.search.spell_max);
            println!("    default_operator: {}", config.search.default_operator.as_str());
            println!("  autocomplete:");
            println!("    enabled: {}", config.autocomplete.enabled);
            println!("    max_suggestions: {}", config.autocomplete.max_suggestions);
            println!("  catalog:");
            match &config.catalog.fields_file {
                Some(path) => println!("    fields_file: {}", path.display()),
                None => println!("    fields_file: (embedded artifact catalog)"),
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config.as_ref())?);
        }
    }

    Ok(())
}
