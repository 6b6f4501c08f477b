//! Storage layer for local catalog collections.
//!
//! Each collection is an isolated Tantivy index whose schema is
//! derived from the field registry.
//!
//! # Collection Storage Structure
//!
//! ```text
//! {index_dir}/collections/
//! ├── {collection-id}/
//! │   ├── meta.json           # Collection metadata
//! │   └── tantivy/            # Tantivy index
//! │       ├── meta.json
//! │       └── [segment files]
//! ```

mod collection;
pub mod tantivy;

pub use collection::{CollectionMetadata, StorageManager};
pub use self::tantivy::{TantivyIndex, SCHEMA_VERSION};
