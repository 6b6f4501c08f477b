//! CLI adapter for Vitrine
//!
//! Provides a command-line interface to catalog search and to local
//! collection management. Depends on `core/` only.
//!
//! # Architecture
//!
//! ```text
//!              +------------------+
//!              |     core/        |
//!              |  (domain logic)  |
//!              +--------+---------+
//!                       |
//!                       v
//!              +------------------+
//!              |      cli/        |
//!              | (clap adapter)   |
//!              +------------------+
//! ```

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

/// Vitrine - Faceted search for the MMAP artifact catalog
///
/// Search the catalog with facets, open artifact records, and load
/// tab-separated exports into local collections.
#[derive(Parser, Debug)]
#[command(name = "vitrine")]
#[command(version)]
#[command(about = "Faceted search for the MMAP artifact catalog", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Log line format on stderr
    #[arg(long, global = true, default_value = "text")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Log format for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search the catalog
    Search(commands::SearchArgs),

    /// Show one artifact record
    Show(commands::ShowArgs),

    /// List all values of one facet for a search
    Facet(commands::FacetArgs),

    /// Suggest completions for partial search input
    Suggest(commands::SuggestArgs),

    /// Load a tab-separated export into a local collection
    Ingest(commands::IngestArgs),

    /// List local collections
    #[command(name = "list-collections")]
    ListCollections(commands::collection::ListArgs),

    /// Delete a local collection
    #[command(name = "delete-collection")]
    DeleteCollection(commands::collection::DeleteArgs),

    /// List registered catalog fields
    #[command(name = "list-fields")]
    ListFields(commands::FieldsArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Show version and backend information
    #[command(name = "get-server-info")]
    GetServerInfo(commands::InfoArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  vitrine completions bash > ~/.local/share/bash-completion/completions/vitrine
    ///   zsh:   vitrine completions zsh > ~/.zfunc/_vitrine
    ///   fish:  vitrine completions fish > ~/.config/fish/completions/vitrine.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;
    use crate::core::services::Services;
    use crate::core::xdg::XdgDirs;
    use std::sync::Arc;

    // Handle completions command early (doesn't need services)
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    // Initialize XDG directories
    let xdg = XdgDirs::new();
    if let Err(e) = xdg.ensure_dirs_exist() {
        output::print_warning(&format!("Could not create data directories: {e}"));
    }

    // Load configuration
    let config = Config::load()?;
    config.log_config();

    // Create services
    let services = Arc::new(Services::new(config)?);

    // Execute command
    match cli.command {
        Commands::Search(args) => commands::search::execute(args, &services, cli.format).await,
        Commands::Show(args) => commands::show::execute(args, &services, cli.format).await,
        Commands::Facet(args) => commands::facet::execute(args, &services, cli.format).await,
        Commands::Suggest(args) => commands::suggest::execute(args, &services, cli.format).await,
        Commands::Ingest(args) => commands::ingest::execute(args, &services, cli.format).await,
        Commands::ListCollections(args) => {
            commands::collection::execute_list(args, &services, cli.format).await
        }
        Commands::DeleteCollection(args) => {
            commands::collection::execute_delete(args, &services, cli.format).await
        }
        Commands::ListFields(args) => commands::fields::execute(args, &services, cli.format).await,
        Commands::ShowConfig(args) => commands::config::execute(args, &services, cli.format).await,
        Commands::GetServerInfo(args) => commands::info::execute(args, &services, cli.format).await,
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}
