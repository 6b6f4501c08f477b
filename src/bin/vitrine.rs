//! Vitrine CLI - faceted search for the MMAP artifact catalog
//!
//! # Examples
//!
//! ```bash
//! # Load an export into the local collection
//! vitrine ingest artifacts.tsv
//!
//! # Search with a facet filter
//! vitrine search "bead" --filter site_name_s=Megiddo
//!
//! # All values of one facet
//! vitrine facet material_s "bead"
//!
//! # One record
//! vitrine show 1042
//! ```

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vitrine::cli::output::print_error;
use vitrine::cli::{run, Cli, LogFormat};

fn init_tracing(format: LogFormat) {
    // VITRINE_LOG takes precedence over RUST_LOG
    let filter = EnvFilter::try_from_env("VITRINE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("vitrine=warn"));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    if let Err(e) = run(cli).await {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
