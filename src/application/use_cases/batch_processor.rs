// ============================================================
// BATCH PROCESSOR
// ============================================================
// Orchestrate header assignment, mapping, classification and global
// deduplication across every table of one upload

use std::sync::Arc;

use uuid::Uuid;

use crate::application::use_cases::column_mapper::ColumnMapper;
use crate::application::use_cases::completeness::classify;
use crate::application::use_cases::deduplicator::dedupe;
use crate::application::use_cases::record_mapper::map_record;
use crate::domain::batch::{BatchSummary, DecodedFile, SkippedFile, SourceTable};
use crate::domain::record::ClassifiedRecord;

/// Per-request accumulator. Owned by one call to
/// [`BatchProcessor::process_batch`] and returned from it; nothing is
/// shared between requests.
#[derive(Debug, Default)]
struct BatchAccumulator {
    records: Vec<ClassifiedRecord>,
    files_processed: usize,
    skipped: Vec<SkippedFile>,
}

/// Pipeline orchestrator
#[derive(Clone)]
pub struct BatchProcessor {
    mapper: Arc<ColumnMapper>,
}

impl BatchProcessor {
    pub fn new(mapper: Arc<ColumnMapper>) -> Self {
        Self { mapper }
    }

    /// Run one table through header assignment, mapping and classification
    pub fn process_table(&self, table: &SourceTable) -> Vec<ClassifiedRecord> {
        let assignment = self.mapper.assign_table(&table.records);

        tracing::debug!(
            table = %table.label(),
            rows = table.records.len(),
            mapped_headers = assignment.len(),
            "assigned table headers"
        );

        table
            .records
            .iter()
            .map(|raw| classify(&map_record(raw, &assignment)))
            .collect()
    }

    /// Process every decoded file, then deduplicate the combined records
    /// once. Files that failed to decode are listed in `skipped` and
    /// contribute no records.
    pub fn process_batch(&self, files: Vec<DecodedFile>) -> BatchSummary {
        let accumulator = files
            .into_iter()
            .fold(BatchAccumulator::default(), |acc, file| {
                self.accumulate_file(acc, file)
            });

        let BatchAccumulator {
            records,
            files_processed,
            skipped,
        } = accumulator;

        let (data, dedup_count) = dedupe(records);
        let valid_count = data.iter().filter(|r| r.is_valid()).count();
        let record_count = data.len();

        tracing::info!(
            files = files_processed,
            skipped = skipped.len(),
            records = record_count,
            removed = dedup_count,
            valid = valid_count,
            "batch processed"
        );

        BatchSummary {
            batch_id: Uuid::new_v4(),
            record_count,
            dedup_count,
            valid_count,
            missing_count: record_count - valid_count,
            files_processed,
            skipped,
            data,
        }
    }

    /// Process bare tables, one file per distinct source name
    pub fn process_tables(&self, tables: Vec<SourceTable>) -> BatchSummary {
        let mut files: Vec<DecodedFile> = Vec::new();
        for table in tables {
            match files.iter().position(|f| f.file == table.source_file) {
                Some(idx) => {
                    if let Ok(existing) = &mut files[idx].tables {
                        existing.push(table);
                    }
                }
                None => files.push(DecodedFile::decoded(table.source_file.clone(), vec![table])),
            }
        }
        self.process_batch(files)
    }

    fn accumulate_file(&self, mut acc: BatchAccumulator, file: DecodedFile) -> BatchAccumulator {
        match file.tables {
            Ok(tables) => {
                acc.files_processed += 1;
                for table in &tables {
                    let records = self.process_table(table);
                    tracing::info!(
                        table = %table.label(),
                        rows = table.records.len(),
                        records = records.len(),
                        "table processed"
                    );
                    acc.records.extend(records);
                }
            }
            Err(err) => {
                tracing::warn!(file = %file.file, error = %err, "skipping file that failed to decode");
                acc.skipped.push(SkippedFile {
                    file: file.file,
                    reason: err.to_string(),
                });
            }
        }
        acc
    }
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self::new(Arc::new(ColumnMapper::default()))
    }
}
