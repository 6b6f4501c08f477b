//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for a specific CLI command.

pub mod collection;
pub mod completions;
pub mod config;
pub mod facet;
pub mod fields;
pub mod info;
pub mod ingest;
pub mod search;
pub mod show;
pub mod suggest;

// Re-export argument types for use in mod.rs
pub use completions::CompletionsArgs;
pub use config::ConfigArgs;
pub use facet::FacetArgs;
pub use fields::FieldsArgs;
pub use info::InfoArgs;
pub use ingest::IngestArgs;
pub use search::{RequestArgs, SearchArgs};
pub use show::ShowArgs;
pub use suggest::SuggestArgs;
