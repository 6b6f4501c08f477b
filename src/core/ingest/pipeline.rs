//! Ingest pipeline orchestration.
//!
//! Coordinates loading an export into a collection:
//! 1. Stream rows from the export
//! 2. Skip rows that cannot become records
//! 3. Write records in batches
//! 4. Commit

use std::path::Path;
use std::time::Instant;

use crate::core::error::Result;
use crate::core::ingest::tsv::{TsvReader, TsvRow};
use crate::core::registry::FieldRegistry;
use crate::core::storage::TantivyIndex;
use crate::core::types::{IngestStats, RawDocument};

const BATCH_SIZE: usize = 1_000;

/// Loads exports into an index
pub struct IngestPipeline<'a> {
    registry: &'a FieldRegistry,
}

impl<'a> IngestPipeline<'a> {
    pub fn new(registry: &'a FieldRegistry) -> Self {
        Self { registry }
    }

    /// Ingest a tab-separated export into `index` and commit
    ///
    /// Rows that cannot be read are logged and skipped; the export as a
    /// whole fails only when its header is unusable or writing fails.
    pub fn ingest_file(&self, path: &Path, index: &mut TantivyIndex) -> Result<IngestStats> {
        let start = Instant::now();
        tracing::info!("Starting ingest from {:?}", path);

        let reader = TsvReader::open(path, self.registry.id_field())?;
        let unregistered: Vec<&String> = reader
            .headers()
            .iter()
            .filter(|h| !h.is_empty() && !self.registry.contains(h))
            .collect();
        if !unregistered.is_empty() {
            tracing::debug!(
                "{} columns are not registered fields (stored only): {:?}",
                unregistered.len(),
                unregistered
            );
        }

        let mut batch: Vec<RawDocument> = Vec::with_capacity(BATCH_SIZE);
        let mut documents_indexed = 0;
        let mut rows_skipped = 0;

        for row in reader {
            match row {
                Ok(TsvRow::Record(doc)) => {
                    batch.push(doc);
                    if batch.len() == BATCH_SIZE {
                        index.add_records(&batch, self.registry)?;
                        documents_indexed += batch.len();
                        batch.clear();
                        tracing::info!("Progress: {} documents written", documents_indexed);
                    }
                }
                Ok(TsvRow::Skipped { line, reason }) => {
                    tracing::warn!("Skipping line {}: {}", line, reason);
                    rows_skipped += 1;
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable row: {}", e);
                    rows_skipped += 1;
                }
            }
        }

        if !batch.is_empty() {
            index.add_records(&batch, self.registry)?;
            documents_indexed += batch.len();
        }

        index.commit()?;

        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            "Ingest complete: {} documents indexed, {} rows skipped in {}ms",
            documents_indexed,
            rows_skipped,
            duration_ms
        );

        Ok(IngestStats {
            documents_indexed,
            rows_skipped,
            duration_ms,
            collection: String::new(), // Filled by caller
        })
    }
}
