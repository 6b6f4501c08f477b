//! Loading tab-separated catalog exports into local collections.

pub mod pipeline;
pub mod tsv;

pub use pipeline::IngestPipeline;
pub use tsv::{TsvReader, TsvRow};
