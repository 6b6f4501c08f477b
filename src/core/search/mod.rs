//! Catalog search.
//!
//! Requests are validated and turned into index queries by the
//! [`QueryBuilder`], sent to a backend with bounded retries, and
//! projected into view-ready responses by the [`ResponseProjector`].
//! [`CatalogService`] ties the pieces together.

mod autocomplete;
mod builder;
mod projector;
mod query;
mod retry;
mod service;

pub use autocomplete::AutocompleteAdapter;
pub use builder::QueryBuilder;
pub use projector::ResponseProjector;
pub use query::{escape_query, is_quoted, normalize_query, query_terms};
pub use retry::RetryPolicy;
pub use service::CatalogService;
