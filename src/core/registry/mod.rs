//! Field and action registries.
//!
//! # Architecture
//!
//! - **FieldRegistry**: ordered field definitions with their roles
//! - **catalog**: embedded artifact catalog, built once
//! - **file**: registry loaded from a TOML fields file
//! - **ActionRegistry**: UI actions per scope

mod actions;
pub mod catalog;
mod field;
pub mod file;

pub use actions::{ActionKind, ActionRegistry, ActionScope};
pub use catalog::artifact_registry;
pub use field::{
    FieldDefinition, FieldRegistry, FieldRegistryBuilder, FieldRole, DEFAULT_QUERY_WEIGHT,
};

use crate::core::config::CatalogConfig;
use crate::core::error::Result;
use std::sync::Arc;

/// Resolve the registry named by the catalog configuration
pub fn load(config: &CatalogConfig) -> Result<Arc<FieldRegistry>> {
    match &config.fields_file {
        Some(path) => Ok(Arc::new(file::load_registry(path)?)),
        None => artifact_registry(),
    }
}
