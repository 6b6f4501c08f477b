// Common test utilities and fixtures

pub mod helpers;

// Re-export commonly used items
// Note: These may appear unused in unit tests but are used in integration tests
#[allow(unused_imports)]
pub use fixtures::ArtifactExport;
#[allow(unused_imports)]
pub use helpers::{
    assert_valid_stats, create_test_services, create_test_services_with, ingest_export, record,
    sample_services,
};
